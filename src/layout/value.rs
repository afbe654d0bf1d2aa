//! Record instances: decoded values in shape order

use chrono::{NaiveDateTime, TimeDelta};

use super::{Error, Result};

/// Value of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// BOOL
    Bool(bool),
    /// BYTE
    Byte(u8),
    /// INT
    Int16(i16),
    /// WORD
    UInt16(u16),
    /// DINT
    Int32(i32),
    /// DWORD
    UInt32(u32),
    /// LINT
    Int64(i64),
    /// LWORD
    UInt64(u64),
    /// REAL
    Float32(f32),
    /// LREAL
    Float64(f64),
    /// DATE_AND_TIME or DTL
    DateTime(NaiveDateTime),
    /// TIME
    TimeSpan(TimeDelta),
    /// STRING or WSTRING
    String(String),
    /// Nested record
    Record(Record),
    /// Repeated field
    Array(Vec<Value>),
}

impl Value {
    /// Name of the value's kind, matching [`FieldType::name`](super::FieldType::name)
    /// for scalars.
    #[must_use]
    pub fn kind_name(&self) -> String {
        match self {
            Self::Bool(_) => "bool".into(),
            Self::Byte(_) => "byte".into(),
            Self::Int16(_) => "int16".into(),
            Self::UInt16(_) => "uint16".into(),
            Self::Int32(_) => "int32".into(),
            Self::UInt32(_) => "uint32".into(),
            Self::Int64(_) => "int64".into(),
            Self::UInt64(_) => "uint64".into(),
            Self::Float32(_) => "float32".into(),
            Self::Float64(_) => "float64".into(),
            Self::DateTime(_) => "date-time".into(),
            Self::TimeSpan(_) => "time-span".into(),
            Self::String(_) => "string".into(),
            Self::Record(record) => record.type_name().into(),
            Self::Array(items) => format!("array of {}", items.len()),
        }
    }
}

macro_rules! value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

/// Extraction of a typed value from a [`Value`]
pub trait FromValue: Sized {
    /// Return the typed value if `value` holds this type.
    fn from_value(value: &Value) -> Option<Self>;
}

value_conversions! {
    bool => Bool,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    NaiveDateTime => DateTime,
    TimeDelta => TimeSpan,
    String => String,
    Record => Record,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

/// A populated record: field names and values in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Start building a record of type `type_name`.
    pub fn builder(type_name: impl Into<String>) -> RecordBuilder {
        RecordBuilder::new(type_name)
    }

    /// Record type name
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Fields in order
    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value of field `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Typed value of field `name`.
    pub fn value<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.require(name)?;
        T::from_value(value).ok_or_else(|| Error::ShapeMismatch {
            record: self.type_name.clone(),
            field: name.to_owned(),
            expected: std::any::type_name::<T>().to_owned(),
            found: value.kind_name(),
        })
    }

    /// Nested record at field `name`
    pub fn record(&self, name: &str) -> Result<&Record> {
        match self.require(name)? {
            Value::Record(record) => Ok(record),
            other => Err(Error::ShapeMismatch {
                record: self.type_name.clone(),
                field: name.to_owned(),
                expected: "record".into(),
                found: other.kind_name(),
            }),
        }
    }

    /// Nested records of the repeated field `name`
    pub fn records(&self, name: &str) -> Result<Vec<&Record>> {
        let mismatch = |found: String| Error::ShapeMismatch {
            record: self.type_name.clone(),
            field: name.to_owned(),
            expected: "array of records".into(),
            found,
        };
        match self.require(name)? {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Record(record) => Ok(record),
                    other => Err(mismatch(other.kind_name())),
                })
                .collect(),
            other => Err(mismatch(other.kind_name())),
        }
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| Error::ShapeMismatch {
            record: self.type_name.clone(),
            field: name.to_owned(),
            expected: "a value".into(),
            found: "nothing".into(),
        })
    }
}

/// Accumulates field values and produces a [`Record`] once complete
#[derive(Debug)]
pub struct RecordBuilder {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl RecordBuilder {
    /// Create a new builder for a record of type `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(type_name: impl Into<String>, capacity: usize) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Freeze the record.
    #[must_use]
    pub fn build(self) -> Record {
        Record {
            type_name: self.type_name,
            fields: self.fields,
        }
    }
}
