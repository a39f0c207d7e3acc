//! In-memory Typst world holding a single source file
//!
//! Reports never read from disk: the template is the only source and the
//! report data reaches it through `sys.inputs`.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Array, Bytes, Datetime, Dict, Value};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use super::fonts::{global_font_cache, FontCache};
use crate::compiler::errors::ServerError;

pub struct VirtualWorld {
    main: Source,
    font_cache: &'static FontCache,
    /// Clock seen by `datetime.today()`
    now: DateTime<Utc>,
    library: LazyHash<Library>,
}

impl VirtualWorld {
    pub fn new(
        source: String,
        inputs: HashMap<String, serde_json::Value>,
    ) -> Result<Self, ServerError> {
        let id = FileId::new(None, VirtualPath::new("/main.typ"));

        let mut dict = Dict::new();
        for (key, value) in inputs {
            dict.insert(key.into(), json_to_typst_value(&value)?);
        }
        let library = Library::builder().with_inputs(dict).build();

        Ok(Self {
            main: Source::new(id, source),
            font_cache: global_font_cache(),
            now: Utc::now(),
            library: LazyHash::new(library),
        })
    }

    /// Pin the clock, for reproducible output
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn main_source(&self) -> &Source {
        &self.main
    }
}

/// Convert a JSON value to a Typst value
///
/// Integers stay integers so templates can do arithmetic on them.
pub fn json_to_typst_value(json: &serde_json::Value) -> Result<Value, ServerError> {
    Ok(match json {
        serde_json::Value::Null => Value::None,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(f)) => Value::Float(f),
            (None, None) => {
                return Err(ServerError::InvalidInput(format!("Unsupported number: {}", n)))
            }
        },
        serde_json::Value::String(s) => Value::Str(s.as_str().into()),
        serde_json::Value::Array(items) => {
            let values = items
                .iter()
                .map(json_to_typst_value)
                .collect::<Result<Vec<_>, _>>()?;
            Value::Array(Array::from(values.as_slice()))
        }
        serde_json::Value::Object(map) => {
            let mut dict = Dict::new();
            for (key, value) in map {
                dict.insert(key.as_str().into(), json_to_typst_value(value)?);
            }
            Value::Dict(dict)
        }
    })
}

impl World for VirtualWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.font_cache.book()
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.font_cache.font(index)
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let local = self.now + Duration::hours(offset.unwrap_or(0));
        Datetime::from_ymd_hms(
            local.year(),
            local.month() as u8,
            local.day() as u8,
            local.hour() as u8,
            local.minute() as u8,
            local.second() as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_main_source_is_served() {
        let world = VirtualWorld::new("Hello".to_string(), HashMap::new()).unwrap();
        let source = world.source(world.main()).unwrap();
        assert_eq!(source.text(), "Hello");
    }

    #[test]
    fn test_other_files_are_not_found() {
        let world = VirtualWorld::new("Hello".to_string(), HashMap::new()).unwrap();
        let other = FileId::new(None, VirtualPath::new("/logo.png"));
        assert!(world.file(other).is_err());
        assert!(world.source(other).is_err());
    }

    #[test]
    fn test_nested_inputs() {
        let value = json_to_typst_value(&serde_json::json!({
            "sections": [{ "title": "SI 1", "compliant": true }],
            "count": 1
        }))
        .unwrap();
        let Value::Dict(dict) = value else {
            panic!("expected a dictionary, got {:?}", value);
        };
        assert!(dict.contains("sections"));
        assert_eq!(dict.get("count").unwrap(), &Value::Int(1));
    }

    #[test]
    fn test_number_conversion() {
        assert_eq!(json_to_typst_value(&serde_json::json!(3)).unwrap(), Value::Int(3));
        assert_eq!(
            json_to_typst_value(&serde_json::json!(2.5)).unwrap(),
            Value::Float(2.5)
        );
    }

    #[test]
    fn test_pinned_clock() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 23, 30, 0).unwrap();
        let world = VirtualWorld::new("".to_string(), HashMap::new())
            .unwrap()
            .at(now);
        let today = world.today(Some(2)).unwrap();
        assert_eq!(today.day(), Some(6));
        assert_eq!(today.month(), Some(3));
    }
}
