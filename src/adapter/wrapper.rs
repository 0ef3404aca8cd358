use std::{
    any::{Any, type_name},
    io::{Read, Write},
    sync::Arc,
};

use crate::{
    AdapterRegistry, Error, Reflect, Relation, Result, Shape, TagID, TypeAdapter, TypeDescriptor,
    downcast, downcast_ref, enter,
};

/// Handles a type through the adapter of a related type.
///
/// Used for wrappers (`Box<T>`, `Option<T>`) and for types resolved through
/// a capability or parent: values are viewed as the target on the way out
/// and lifted back from it on the way in.
pub struct ProjectedAdapter {
    relation: Relation,
    target: TypeDescriptor,
    inner: Arc<dyn TypeAdapter>,
}

impl ProjectedAdapter {
    pub fn new(relation: Relation, target: TypeDescriptor, inner: Arc<dyn TypeAdapter>) -> Self {
        Self {
            relation,
            target,
            inner,
        }
    }
}

impl TypeAdapter for ProjectedAdapter {
    #[inline]
    fn wire_kind(&self) -> TagID {
        self.inner.wire_kind()
    }

    fn decode(
        &self,
        id: TagID,
        reader: &mut dyn Read,
        _: &TypeDescriptor,
        registry: &AdapterRegistry,
        depth: usize,
    ) -> Result<Box<dyn Any>> {
        let depth = enter(depth)?;
        let value = self.inner.decode(id, reader, &self.target, registry, depth)?;
        self.relation.lift(value)
    }

    fn encode(
        &self,
        writer: &mut dyn Write,
        value: &dyn Any,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Result<()> {
        let target = self
            .relation
            .view(value)?
            .ok_or(Error::MissingValue(ty.name()))?;
        self.inner.encode(writer, target, &self.target, registry)
    }
}

fn view_box<T: Any>(value: &dyn Any) -> Result<Option<&dyn Any>> {
    let boxed = downcast_ref::<Box<T>>(value)?;
    Ok(Some(&**boxed as &dyn Any))
}

fn lift_box<T: Any>(value: Box<dyn Any>) -> Result<Box<dyn Any>> {
    let inner = value
        .downcast::<T>()
        .map_err(|_| Error::UnexpectedValue(type_name::<T>()))?;
    Ok(Box::new(inner))
}

fn view_option<T: Any>(value: &dyn Any) -> Result<Option<&dyn Any>> {
    let option = downcast_ref::<Option<T>>(value)?;
    Ok(option.as_ref().map(|inner| inner as &dyn Any))
}

fn lift_option<T: Any>(value: Box<dyn Any>) -> Result<Box<dyn Any>> {
    Ok(Box::new(Some(downcast::<T>(value)?)))
}

impl<T: Reflect> Reflect for Box<T> {
    fn descriptor() -> TypeDescriptor {
        let relation = Relation::new(T::descriptor, view_box::<T>, lift_box::<T>);
        TypeDescriptor::new::<Self>(Shape::Wrapper(relation))
    }
}

/// `None` is omitted from objects and maps, and fails with
/// [`Error::MissingValue`] anywhere else.
impl<T: Reflect> Reflect for Option<T> {
    fn descriptor() -> TypeDescriptor {
        let relation = Relation::new(T::descriptor, view_option::<T>, lift_option::<T>);
        TypeDescriptor::new::<Self>(Shape::Wrapper(relation))
    }
}
