//! Typed data blocks
//!
//! A [`DataBlock`] is a Rust type that knows its own record shape. Shapes are
//! derived once per type and layouts once per (type, controller) pair; both
//! caches are shared by all threads.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use bytes::Bytes;
use tracing::debug;

use super::{CpuModel, Error, FieldType, Layout, Record, RecordShape, Result, ShapeBuilder};

/// A Rust type mapped onto an S7 data block or UDT.
///
/// ```
/// use s7_layout::{CpuModel, DataBlock, Record, Result, ShapeBuilder};
///
/// struct Valve {
///     open: bool,
///     position: i16,
/// }
///
/// impl DataBlock for Valve {
///     const TYPE_NAME: &'static str = "Valve";
///
///     fn describe(shape: ShapeBuilder) -> ShapeBuilder {
///         shape.bool("open").int16("position")
///     }
///
///     fn to_record(&self) -> Record {
///         Record::builder(Self::TYPE_NAME)
///             .field("open", self.open)
///             .field("position", self.position)
///             .build()
///     }
///
///     fn from_record(record: &Record) -> Result<Self> {
///         Ok(Self {
///             open: record.value("open")?,
///             position: record.value("position")?,
///         })
///     }
/// }
///
/// let bytes = s7_layout::encode_block(&Valve { open: true, position: 300 }, CpuModel::S71500)?;
/// assert_eq!(bytes.as_ref(), [0x01, 0x00, 0x01, 0x2C]);
/// # Ok::<(), s7_layout::Error>(())
/// ```
pub trait DataBlock: Sized + 'static {
    /// Record type name used in shapes and error messages
    const TYPE_NAME: &'static str;

    /// Declare the fields, in block order.
    fn describe(shape: ShapeBuilder) -> ShapeBuilder;

    /// Convert to a record instance.
    fn to_record(&self) -> Record;

    /// Rebuild from a decoded record instance.
    fn from_record(record: &Record) -> Result<Self>;
}

type ShapeCache = RwLock<HashMap<TypeId, Arc<RecordShape>>>;
type LayoutCache = RwLock<HashMap<(TypeId, CpuModel), Arc<Layout>>>;

fn shapes() -> &'static ShapeCache {
    static SHAPES: OnceLock<ShapeCache> = OnceLock::new();
    SHAPES.get_or_init(ShapeCache::default)
}

fn layouts() -> &'static LayoutCache {
    static LAYOUTS: OnceLock<LayoutCache> = OnceLock::new();
    LAYOUTS.get_or_init(LayoutCache::default)
}

thread_local! {
    /// Types whose shape is being derived on this thread, outermost first
    static DERIVING: RefCell<Vec<(TypeId, &'static str)>> = const { RefCell::new(Vec::new()) };
}

/// Pops the derivation stack even if `describe` panics.
struct DeriveGuard;

impl DeriveGuard {
    fn enter<T: DataBlock>() -> Result<Self> {
        let id = TypeId::of::<T>();
        DERIVING.with_borrow_mut(|stack| {
            if stack.iter().any(|(entry, _)| *entry == id) {
                let mut path: Vec<_> = stack.iter().map(|(_, name)| *name).collect();
                path.push(T::TYPE_NAME);
                return Err(Error::RecursiveShape {
                    record: T::TYPE_NAME.to_owned(),
                    path: path.join(" -> "),
                });
            }
            stack.push((id, T::TYPE_NAME));
            Ok(Self)
        })
    }
}

impl Drop for DeriveGuard {
    fn drop(&mut self) {
        DERIVING.with_borrow_mut(|stack| {
            stack.pop();
        });
    }
}

/// Derived shape of `T`, memoized per type.
pub fn shape_of<T: DataBlock>() -> Result<Arc<RecordShape>> {
    let id = TypeId::of::<T>();
    if let Some(shape) = shapes()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return Ok(Arc::clone(shape));
    }

    let shape = {
        let _guard = DeriveGuard::enter::<T>()?;
        T::describe(ShapeBuilder::new(T::TYPE_NAME)).build()?
    };
    debug!(record = T::TYPE_NAME, fields = shape.fields().len(), "derived shape");

    // Another thread may have won the race; keep whichever landed first.
    let mut cache = shapes().write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(cache.entry(id).or_insert_with(|| Arc::new(shape))))
}

/// Computed layout of `T` on `cpu`, memoized per (type, controller).
pub fn layout_of<T: DataBlock>(cpu: CpuModel) -> Result<Arc<Layout>> {
    let key = (TypeId::of::<T>(), cpu);
    if let Some(layout) = layouts()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(Arc::clone(layout));
    }

    let shape = shape_of::<T>()?;
    let layout = Layout::compute(&shape, cpu)?;
    let mut cache = layouts().write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(cache.entry(key).or_insert_with(|| Arc::new(layout))))
}

/// Number of bytes a `T` occupies in a data block of `cpu`.
pub fn size_of_block<T: DataBlock>(cpu: CpuModel) -> Result<usize> {
    layout_of::<T>(cpu).map(|layout| layout.size())
}

/// Decode a `T` from a buffer read off a controller of model `cpu`.
pub fn decode_block<T: DataBlock>(buffer: &[u8], cpu: CpuModel) -> Result<T> {
    let record = layout_of::<T>(cpu)?.decode(buffer)?;
    T::from_record(&record)
}

/// Encode `block` for a controller of model `cpu`.
pub fn encode_block<T: DataBlock>(block: &T, cpu: CpuModel) -> Result<Bytes> {
    layout_of::<T>(cpu)?.encode(&block.to_record())
}

impl ShapeBuilder {
    /// Add a nested record field of type `T`.
    ///
    /// A derivation failure of `T` is reported by [`ShapeBuilder::build`].
    #[must_use]
    pub fn block<T: DataBlock>(self, name: impl Into<String>) -> Self {
        match shape_of::<T>() {
            Ok(shape) => self.record(name, shape),
            Err(err) => self.defer(err),
        }
    }

    /// Add a fixed-length array of `count` nested records of type `T`.
    #[must_use]
    pub fn block_array<T: DataBlock>(self, name: impl Into<String>, count: usize) -> Self {
        match shape_of::<T>() {
            Ok(shape) => self.array(name, FieldType::Record(shape), count),
            Err(err) => self.defer(err),
        }
    }
}

impl Record {
    /// Nested record at field `name`, converted to `T`
    pub fn block<T: DataBlock>(&self, name: &str) -> Result<T> {
        T::from_record(self.record(name)?)
    }

    /// Nested records of the repeated field `name`, converted to `T`
    pub fn blocks<T: DataBlock>(&self, name: &str) -> Result<Vec<T>> {
        self.records(name)?
            .into_iter()
            .map(T::from_record)
            .collect()
    }
}
