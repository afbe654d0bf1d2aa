//! Record shapes: the ordered field descriptors of a structured type

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::{DateTimeRepr, Error, Result, StringEncoding, VariantConfig};

/// Semantic type of a field (or of each element of a repeated field)
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// BOOL, one bit
    Bool,
    /// BYTE
    Byte,
    /// INT
    Int16,
    /// WORD
    UInt16,
    /// DINT
    Int32,
    /// DWORD
    UInt32,
    /// LINT
    Int64,
    /// LWORD
    UInt64,
    /// REAL
    Float32,
    /// LREAL
    Float64,
    /// DATE_AND_TIME or DTL, chosen by variant configuration
    DateTime,
    /// TIME
    TimeSpan,
    /// STRING or WSTRING, chosen by variant configuration
    String,
    /// Nested record (struct / UDT)
    Record(Arc<RecordShape>),
}

impl FieldType {
    /// Human-readable type name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::DateTime => "date-time",
            Self::TimeSpan => "time-span",
            Self::String => "string",
            Self::Record(shape) => shape.name(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One field of a record shape
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    ty: FieldType,
    repeat: Option<usize>,
    variant: Option<VariantConfig>,
}

impl Field {
    /// Create a scalar field without variant configuration.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            repeat: None,
            variant: None,
        }
    }

    /// Turn the field into a fixed-length array of `count` elements.
    #[must_use]
    pub fn repeated(mut self, count: usize) -> Self {
        self.repeat = Some(count);
        self
    }

    /// Attach variant configuration.
    #[must_use]
    pub fn with_variant(mut self, variant: VariantConfig) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type
    #[must_use]
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// Array length, if the field is repeated
    #[must_use]
    pub fn repeat(&self) -> Option<usize> {
        self.repeat
    }

    /// Declared variant configuration
    #[must_use]
    pub fn variant(&self) -> Option<&VariantConfig> {
        self.variant.as_ref()
    }

    fn check_variant(&self, record: &str) -> Result<()> {
        let Some(variant) = &self.variant else {
            return Ok(());
        };
        let invalid = |reason: String| Error::InvalidVariant {
            record: record.to_owned(),
            field: self.name.clone(),
            reason,
        };

        match (&self.ty, variant) {
            (FieldType::DateTime, VariantConfig::DateTime { .. }) => Ok(()),
            (FieldType::String, VariantConfig::String { encoding, capacity }) => {
                if *capacity > encoding.max_capacity() {
                    return Err(invalid(format!(
                        "{encoding} capacity {capacity} exceeds {}",
                        encoding.max_capacity()
                    )));
                }
                Ok(())
            }
            (ty, variant) => Err(invalid(format!(
                "{} variant on a {ty} field",
                variant.kind_name()
            ))),
        }
    }
}

/// Ordered, immutable field layout description of a structured type
#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    name: String,
    fields: Vec<Field>,
}

impl RecordShape {
    /// Start building a shape for the record type `name`.
    pub fn builder(name: impl Into<String>) -> ShapeBuilder {
        ShapeBuilder::new(name)
    }

    /// Record type name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Fluent builder for [`RecordShape`]
///
/// Field declaration never fails; problems are collected and reported by
/// [`ShapeBuilder::build`].
#[derive(Debug)]
pub struct ShapeBuilder {
    name: String,
    fields: Vec<Field>,
    deferred: Option<Error>,
}

impl ShapeBuilder {
    /// Create a new builder for the record type `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            deferred: None,
        }
    }

    /// Name of the record type being built
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a fully specified field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a scalar field of type `ty`.
    #[must_use]
    pub fn scalar(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.field(Field::new(name, ty))
    }

    /// Add a BOOL field.
    #[must_use]
    pub fn bool(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::Bool)
    }

    /// Add a BYTE field.
    #[must_use]
    pub fn byte(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::Byte)
    }

    /// Add an INT field.
    #[must_use]
    pub fn int16(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::Int16)
    }

    /// Add a WORD field.
    #[must_use]
    pub fn uint16(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::UInt16)
    }

    /// Add a DINT field.
    #[must_use]
    pub fn int32(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::Int32)
    }

    /// Add a DWORD field.
    #[must_use]
    pub fn uint32(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::UInt32)
    }

    /// Add a LINT field.
    #[must_use]
    pub fn int64(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::Int64)
    }

    /// Add a LWORD field.
    #[must_use]
    pub fn uint64(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::UInt64)
    }

    /// Add a REAL field.
    #[must_use]
    pub fn float32(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::Float32)
    }

    /// Add a LREAL field.
    #[must_use]
    pub fn float64(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::Float64)
    }

    /// Add a TIME field.
    #[must_use]
    pub fn time_span(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::TimeSpan)
    }

    /// Add a date/time field using the controller's default representation.
    #[must_use]
    pub fn date_time(self, name: impl Into<String>) -> Self {
        self.scalar(name, FieldType::DateTime)
    }

    /// Add a date/time field with an explicit representation.
    #[must_use]
    pub fn date_time_as(self, name: impl Into<String>, representation: DateTimeRepr) -> Self {
        self.field(
            Field::new(name, FieldType::DateTime)
                .with_variant(VariantConfig::date_time(representation)),
        )
    }

    /// Add a string field with its encoding and capacity in characters.
    #[must_use]
    pub fn string(
        self,
        name: impl Into<String>,
        encoding: StringEncoding,
        capacity: usize,
    ) -> Self {
        self.field(
            Field::new(name, FieldType::String)
                .with_variant(VariantConfig::string(encoding, capacity)),
        )
    }

    /// Add a nested record field.
    #[must_use]
    pub fn record(self, name: impl Into<String>, shape: Arc<RecordShape>) -> Self {
        self.scalar(name, FieldType::Record(shape))
    }

    /// Add a fixed-length array of `count` elements of type `ty`.
    #[must_use]
    pub fn array(self, name: impl Into<String>, ty: FieldType, count: usize) -> Self {
        self.field(Field::new(name, ty).repeated(count))
    }

    /// Remember the first error raised while declaring fields.
    pub(crate) fn defer(mut self, error: Error) -> Self {
        if self.deferred.is_none() {
            self.deferred = Some(error);
        }
        self
    }

    /// Validate and freeze the shape.
    pub fn build(self) -> Result<RecordShape> {
        if let Some(error) = self.deferred {
            return Err(error);
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::DuplicateField {
                    record: self.name,
                    field: field.name.clone(),
                });
            }
            field.check_variant(&self.name)?;
        }

        Ok(RecordShape {
            name: self.name,
            fields: self.fields,
        })
    }
}
