use std::{
    any::{Any, TypeId, type_name},
    fmt,
    marker::PhantomData,
    sync::Arc,
};

use crate::{Error, ObjectDescriptor, Result};

/// A type that can describe its own structure to the adapter registry.
///
/// Implementations exist for the primitives, `String`, `Box`, `Option`,
/// arrays, `Vec`, `VecDeque`, string-keyed maps and the tag containers.
/// User types implement it with [`nbt_object!`](crate::nbt_object) or by
/// hand through [`ObjectDescriptor::builder`] / [`TypeDescriptor::builder`].
pub trait Reflect: Any {
    fn descriptor() -> TypeDescriptor
    where
        Self: Sized;
}

/// Declares that `Self` can be seen as, and rebuilt from, a `P`.
///
/// Used for capabilities ([`DescriptorBuilder::implements`]) and for the
/// parent type ([`DescriptorBuilder::extends`]) that the registry falls back
/// to when `Self` has no adapter of its own.
pub trait Extends<P: Reflect>: Reflect + Sized {
    fn as_parent(&self) -> &P;

    fn from_parent(parent: P) -> Self;
}

/// A borrowed view from one type into a related one, and the way back.
#[derive(Clone, Copy)]
pub struct Relation {
    target: fn() -> TypeDescriptor,
    view: fn(&dyn Any) -> Result<Option<&dyn Any>>,
    lift: fn(Box<dyn Any>) -> Result<Box<dyn Any>>,
}

impl Relation {
    /// Builds a relation from plain function pointers.
    ///
    /// `view` returns `Ok(None)` when the source holds no target value (an
    /// empty `Option`); `lift` wraps a decoded target back into the source.
    pub const fn new(
        target: fn() -> TypeDescriptor,
        view: fn(&dyn Any) -> Result<Option<&dyn Any>>,
        lift: fn(Box<dyn Any>) -> Result<Box<dyn Any>>,
    ) -> Self {
        Self { target, view, lift }
    }

    pub fn extends<S: Extends<P>, P: Reflect>() -> Self {
        Self::new(P::descriptor, view_parent::<S, P>, lift_parent::<S, P>)
    }

    #[inline]
    pub fn target(&self) -> TypeDescriptor {
        (self.target)()
    }

    #[inline]
    pub fn view<'a>(&self, value: &'a dyn Any) -> Result<Option<&'a dyn Any>> {
        (self.view)(value)
    }

    #[inline]
    pub fn lift(&self, value: Box<dyn Any>) -> Result<Box<dyn Any>> {
        (self.lift)(value)
    }
}

fn view_parent<S: Extends<P>, P: Reflect>(value: &dyn Any) -> Result<Option<&dyn Any>> {
    let value = downcast_ref::<S>(value)?;
    Ok(Some(value.as_parent() as &dyn Any))
}

fn lift_parent<S: Extends<P>, P: Reflect>(value: Box<dyn Any>) -> Result<Box<dyn Any>> {
    let parent = downcast::<P>(value)?;
    Ok(Box::new(S::from_parent(parent)))
}

#[inline]
pub(crate) fn downcast_ref<T: Any>(value: &dyn Any) -> Result<&T> {
    value
        .downcast_ref::<T>()
        .ok_or(Error::UnexpectedValue(type_name::<T>()))
}

#[inline]
pub(crate) fn downcast<T: Any>(value: Box<dyn Any>) -> Result<T> {
    value
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| Error::UnexpectedValue(type_name::<T>()))
}

/// Element access for array and collection shapes.
#[derive(Clone, Copy)]
pub struct SequenceInfo {
    element: fn() -> TypeDescriptor,
    items: fn(&dyn Any) -> Result<Vec<&dyn Any>>,
    collect: fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>>,
}

impl SequenceInfo {
    /// Element access for any collection `C` of `T` that iterates by
    /// reference and can be collected from owned elements.
    pub fn of<C, T>() -> Self
    where
        C: Any + FromIterator<T>,
        T: Reflect,
        for<'a> &'a C: IntoIterator<Item = &'a T>,
    {
        Self {
            element: T::descriptor,
            items: items_of::<C, T>,
            collect: collect_into::<C, T>,
        }
    }

    /// Element access for a fixed-size array; decoding fails with
    /// [`Error::LengthMismatch`] unless exactly `N` elements arrive.
    pub fn array<T: Reflect, const N: usize>() -> Self {
        Self {
            element: T::descriptor,
            items: items_of::<[T; N], T>,
            collect: collect_array::<T, N>,
        }
    }

    #[inline]
    pub fn element(&self) -> TypeDescriptor {
        (self.element)()
    }

    #[inline]
    pub fn items<'a>(&self, value: &'a dyn Any) -> Result<Vec<&'a dyn Any>> {
        (self.items)(value)
    }

    #[inline]
    pub fn collect(&self, items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>> {
        (self.collect)(items)
    }
}

fn items_of<C, T>(value: &dyn Any) -> Result<Vec<&dyn Any>>
where
    C: Any,
    T: Any,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
{
    let collection = downcast_ref::<C>(value)?;
    Ok(collection
        .into_iter()
        .map(|item| item as &dyn Any)
        .collect())
}

fn collect_into<C, T>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>>
where
    C: Any + FromIterator<T>,
    T: Any,
{
    let collection = items
        .into_iter()
        .map(downcast::<T>)
        .collect::<Result<C>>()?;
    Ok(Box::new(collection))
}

fn collect_array<T: Any, const N: usize>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>> {
    let items = items
        .into_iter()
        .map(downcast::<T>)
        .collect::<Result<Vec<T>>>()?;
    let array: [T; N] = items
        .try_into()
        .map_err(|items: Vec<T>| Error::LengthMismatch(N, items.len()))?;
    Ok(Box::new(array))
}

/// Entry access for string-keyed map shapes.
#[derive(Clone, Copy)]
pub struct MapInfo {
    value: fn() -> TypeDescriptor,
    entries: fn(&dyn Any) -> Result<Vec<(&str, &dyn Any)>>,
    collect: fn(Vec<(String, Box<dyn Any>)>) -> Result<Box<dyn Any>>,
}

impl MapInfo {
    pub fn of<M, V>() -> Self
    where
        M: Any + FromIterator<(String, V)>,
        V: Reflect,
        for<'a> &'a M: IntoIterator<Item = (&'a String, &'a V)>,
    {
        Self {
            value: V::descriptor,
            entries: entries_of::<M, V>,
            collect: collect_map::<M, V>,
        }
    }

    #[inline]
    pub fn value(&self) -> TypeDescriptor {
        (self.value)()
    }

    #[inline]
    pub fn entries<'a>(&self, value: &'a dyn Any) -> Result<Vec<(&'a str, &'a dyn Any)>> {
        (self.entries)(value)
    }

    #[inline]
    pub fn collect(&self, entries: Vec<(String, Box<dyn Any>)>) -> Result<Box<dyn Any>> {
        (self.collect)(entries)
    }
}

fn entries_of<M, V>(value: &dyn Any) -> Result<Vec<(&str, &dyn Any)>>
where
    M: Any,
    V: Any,
    for<'a> &'a M: IntoIterator<Item = (&'a String, &'a V)>,
{
    let map = downcast_ref::<M>(value)?;
    Ok(map
        .into_iter()
        .map(|(key, value)| (key.as_str(), value as &dyn Any))
        .collect())
}

fn collect_map<M, V>(entries: Vec<(String, Box<dyn Any>)>) -> Result<Box<dyn Any>>
where
    M: Any + FromIterator<(String, V)>,
    V: Any,
{
    let map = entries
        .into_iter()
        .map(|(key, value)| downcast::<V>(value).map(|value| (key, value)))
        .collect::<Result<M>>()?;
    Ok(Box::new(map))
}

/// The structural category of a type, which decides the resolution steps
/// that apply to it.
pub enum Shape {
    /// A leaf that only an exactly registered adapter can handle.
    Primitive,
    /// A transparent wrapper (`Box<T>`, `Option<T>`) handled as what it wraps.
    Wrapper(Relation),
    /// A fixed or boxed array of elements.
    Array(SequenceInfo),
    /// An ordered, growable collection of elements.
    Collection(SequenceInfo),
    /// A map from `String` keys to values.
    StringMap(MapInfo),
    /// An aggregate of named fields.
    Object(ObjectDescriptor),
    /// A type with no structure the registry can use.
    Opaque,
}

impl Shape {
    const fn label(&self) -> &'static str {
        match self {
            Shape::Primitive => "primitive",
            Shape::Wrapper(_) => "wrapper",
            Shape::Array(_) => "array",
            Shape::Collection(_) => "collection",
            Shape::StringMap(_) => "string map",
            Shape::Object(_) => "object",
            Shape::Opaque => "opaque",
        }
    }
}

struct TypeInfo {
    id: TypeId,
    name: &'static str,
    shape: Shape,
    capabilities: Vec<Relation>,
    parent: Option<Relation>,
}

/// Everything the registry knows about one type.
///
/// Cheap to clone; built on demand by [`Reflect::descriptor`].
#[derive(Clone)]
pub struct TypeDescriptor(Arc<TypeInfo>);

impl TypeDescriptor {
    #[inline]
    pub fn of<T: Reflect>() -> Self {
        T::descriptor()
    }

    /// A descriptor for `T` with the given shape and no relations.
    pub fn new<T: Any>(shape: Shape) -> Self {
        Self::builder::<T>(shape).build()
    }

    pub fn primitive<T: Any>() -> Self {
        Self::new::<T>(Shape::Primitive)
    }

    pub fn opaque<T: Any>() -> Self {
        Self::new::<T>(Shape::Opaque)
    }

    pub fn builder<T: Any>(shape: Shape) -> DescriptorBuilder<T> {
        DescriptorBuilder {
            shape,
            capabilities: Vec::new(),
            parent: None,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.0.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.0.name
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.0.shape
    }

    /// Directly implemented capabilities, in declaration order.
    #[inline]
    pub fn capabilities(&self) -> &[Relation] {
        &self.0.capabilities
    }

    #[inline]
    pub fn parent(&self) -> Option<&Relation> {
        self.0.parent.as_ref()
    }

    /// Returns `true` if `value` is an empty wrapper, such as `None`.
    pub fn is_absent(&self, value: &dyn Any) -> bool {
        match self.shape() {
            Shape::Wrapper(relation) => matches!(relation.view(value), Ok(None)),
            _ => false,
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name())
            .field("shape", &self.shape().label())
            .field("capabilities", &self.capabilities().len())
            .field("parent", &self.parent().map(|parent| parent.target().name()))
            .finish()
    }
}

/// Assembles a [`TypeDescriptor`] with capabilities and a parent.
///
/// ```
/// use tbnbt::{Extends, Reflect, Shape, TypeDescriptor};
///
/// struct Meters(f64);
///
/// impl Extends<f64> for Meters {
///     fn as_parent(&self) -> &f64 {
///         &self.0
///     }
///
///     fn from_parent(parent: f64) -> Self {
///         Meters(parent)
///     }
/// }
///
/// impl Reflect for Meters {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Meters>(Shape::Opaque)
///             .extends::<f64>()
///             .build()
///     }
/// }
///
/// assert_eq!(Meters::descriptor().parent().unwrap().target().name(), "f64");
/// ```
pub struct DescriptorBuilder<T> {
    shape: Shape,
    capabilities: Vec<Relation>,
    parent: Option<Relation>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> DescriptorBuilder<T> {
    /// Adds a capability, consulted before the parent during resolution.
    pub fn implements<C: Reflect>(mut self) -> Self
    where
        T: Extends<C>,
    {
        self.capabilities.push(Relation::extends::<T, C>());
        self
    }

    /// Sets the parent type, consulted after all capabilities.
    pub fn extends<P: Reflect>(mut self) -> Self
    where
        T: Extends<P>,
    {
        self.parent = Some(Relation::extends::<T, P>());
        self
    }

    pub(crate) fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor(Arc::new(TypeInfo {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape: self.shape,
            capabilities: self.capabilities,
            parent: self.parent,
        }))
    }
}
