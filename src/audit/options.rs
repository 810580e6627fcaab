//! Enrichment and filtering configuration for the audit pipeline
//!
//! Every function is optional. An absent label function disables the label
//! gate, an absent filter keeps every record, and so on. Functions are
//! stored behind `Arc` so one configuration can be shared by concurrent
//! callers.

use std::fmt;
use std::sync::Arc;

use crate::audit::record::AuditRecord;
use crate::config::Settings;
use crate::error::{AuditError, AuditResult};
use crate::models::{DocumentContext, Path, UserId, Value};

/// Produces a human-readable label, or a declared type, for a path
pub type TextFn = Arc<dyn Fn(&Path, &DocumentContext) -> AuditResult<Option<String>> + Send + Sync>;

/// Produces the user responsible for a change at a path
pub type UserFn = Arc<dyn Fn(&Path, &DocumentContext) -> AuditResult<Option<UserId>> + Send + Sync>;

/// Decides whether a finished record is kept
pub type FilterFn =
    Arc<dyn Fn(&AuditRecord, &Path, &DocumentContext) -> AuditResult<bool> + Send + Sync>;

/// Top-level fields that are bookkeeping rather than content
pub const DEFAULT_IGNORED_FIELDS: [&str; 4] = ["_id", "__v", "created_at", "updated_at"];

#[derive(Clone)]
pub struct AuditOptions {
    pub(crate) label: Option<TextFn>,
    pub(crate) kind: Option<TextFn>,
    pub(crate) user: Option<UserFn>,
    pub(crate) filter: Option<FilterFn>,
    pub(crate) ignored_fields: Vec<String>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            label: None,
            kind: None,
            user: None,
            filter: None,
            ignored_fields: DEFAULT_IGNORED_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl fmt::Debug for AuditOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditOptions")
            .field("label", &self.label.is_some())
            .field("kind", &self.kind.is_some())
            .field("user", &self.user.is_some())
            .field("filter", &self.filter.is_some())
            .field("ignored_fields", &self.ignored_fields)
            .finish()
    }
}

impl AuditOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a label to every record; changes without a label are dropped
    pub fn with_label<F>(mut self, f: F) -> Self
    where
        F: Fn(&Path, &DocumentContext) -> AuditResult<Option<String>> + Send + Sync + 'static,
    {
        self.label = Some(Arc::new(f));
        self
    }

    /// Attach a declared type to every record
    pub fn with_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Path, &DocumentContext) -> AuditResult<Option<String>> + Send + Sync + 'static,
    {
        self.kind = Some(Arc::new(f));
        self
    }

    /// Attach the responsible user to every record
    pub fn with_user<F>(mut self, f: F) -> Self
    where
        F: Fn(&Path, &DocumentContext) -> AuditResult<Option<UserId>> + Send + Sync + 'static,
    {
        self.user = Some(Arc::new(f));
        self
    }

    /// Keep only records for which `f` returns true
    pub fn with_filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&AuditRecord, &Path, &DocumentContext) -> AuditResult<bool> + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(f));
        self
    }

    /// Replace the list of ignored top-level fields
    pub fn with_ignored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignored_fields(&self) -> &[String] {
        &self.ignored_fields
    }

    /// Whether a change at `path` is bookkeeping noise
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.len() == 1
            && path
                .last()
                .map(|segment| self.ignored_fields.iter().any(|f| *f == segment.to_string()))
                .unwrap_or(false)
    }

    /// Build options from the settings file
    ///
    /// Labels and types are looked up by exact path first, then by pattern
    /// (`items.*.name`). With `require_labels` set, the label gate is active
    /// even when no labels are configured.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut options = Self::new().with_ignored_fields(settings.ignored_fields.clone());

        if !settings.labels.is_empty() || settings.require_labels {
            let labels = settings.labels.clone();
            options = options.with_label(move |path, _doc| Ok(lookup(&labels, path)));
        }

        if !settings.types.is_empty() {
            let types = settings.types.clone();
            options = options.with_type(move |path, _doc| Ok(lookup(&types, path)));
        }

        if let Some(field) = settings.user_field.clone() {
            options = options.with_user(move |_path, doc| user_from_field(doc, &field));
        }

        options
    }
}

fn lookup(table: &std::collections::BTreeMap<String, String>, path: &Path) -> Option<String> {
    table
        .get(&path.to_string())
        .or_else(|| table.get(&path.pattern()))
        .cloned()
}

fn user_from_field(doc: &DocumentContext, field: &str) -> AuditResult<Option<UserId>> {
    match doc.field(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Reference(reference)) => Ok(Some(UserId::from_uuid(reference.id))),
        Some(Value::String(s)) => UserId::parse(s).map(Some).map_err(|e| {
            AuditError::Enrichment(format!("field '{}' is not a user id: {}", field, e))
        }),
        Some(other) => Err(AuditError::Enrichment(format!(
            "field '{}' is not a user id: {}",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentId;
    use serde_json::json;

    fn doc(state: serde_json::Value) -> DocumentContext {
        DocumentContext::new(DocumentId::new(), 1, state)
    }

    #[test]
    fn test_default_options_have_no_functions() {
        let options = AuditOptions::default();
        assert!(options.label.is_none());
        assert!(options.kind.is_none());
        assert!(options.user.is_none());
        assert!(options.filter.is_none());
        assert_eq!(options.ignored_fields(), ["_id", "__v", "created_at", "updated_at"]);
    }

    #[test]
    fn test_is_ignored_only_at_top_level() {
        let options = AuditOptions::default();
        assert!(options.is_ignored(&Path::from_segments(["__v"])));
        assert!(options.is_ignored(&Path::from_segments(["updated_at"])));
        assert!(!options.is_ignored(&Path::from_segments(["meta", "updated_at"])));
        assert!(!options.is_ignored(&Path::from_segments(["title"])));
    }

    #[test]
    fn test_from_settings_labels_and_types() {
        let mut settings = Settings::default();
        settings.labels.insert("items.*.name".into(), "Item name".into());
        settings.labels.insert("title".into(), "Title".into());
        settings.types.insert("title".into(), "string".into());

        let options = AuditOptions::from_settings(&settings);
        let doc = doc(json!({}));
        let label = options.label.as_ref().unwrap();
        let kind = options.kind.as_ref().unwrap();

        let item = Path::root().child("items").child(4usize).child("name");
        assert_eq!(label(&item, &doc).unwrap().as_deref(), Some("Item name"));
        assert_eq!(
            label(&Path::from_segments(["title"]), &doc).unwrap().as_deref(),
            Some("Title")
        );
        assert_eq!(label(&Path::from_segments(["other"]), &doc).unwrap(), None);
        assert_eq!(
            kind(&Path::from_segments(["title"]), &doc).unwrap().as_deref(),
            Some("string")
        );
    }

    #[test]
    fn test_from_settings_without_labels_has_no_gate() {
        let options = AuditOptions::from_settings(&Settings::default());
        assert!(options.label.is_none());

        let settings = Settings {
            require_labels: true,
            ..Settings::default()
        };
        assert!(AuditOptions::from_settings(&settings).label.is_some());
    }

    #[test]
    fn test_user_from_field() {
        let settings = Settings {
            user_field: Some("owner".into()),
            ..Settings::default()
        };
        let options = AuditOptions::from_settings(&settings);
        let user = options.user.as_ref().unwrap();
        let path = Path::from_segments(["title"]);

        let id = UserId::new();
        let with_owner = doc(json!({"owner": id.as_uuid().to_string()}));
        assert_eq!(user(&path, &with_owner).unwrap(), Some(id));

        let with_ref = doc(json!({"owner": {"$oid": id.as_uuid().to_string()}}));
        assert_eq!(user(&path, &with_ref).unwrap(), Some(id));

        assert_eq!(user(&path, &doc(json!({}))).unwrap(), None);

        let err = user(&path, &doc(json!({"owner": 42}))).unwrap_err();
        assert!(matches!(err, AuditError::Enrichment(_)));
    }
}
