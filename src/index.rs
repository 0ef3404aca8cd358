mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<T: ?Sized + Sealed> Sealed for &T {}
}

/// Where an [`Index`] points inside a container.
#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub enum Position<'a> {
    Element(usize),
    Key(&'a str),
}

/// A position into a [`List`](crate::List) (`usize`) or a key into a
/// [`Compound`](crate::Compound) (`&str`, `String`).
pub trait Index: private::Sealed {
    #[doc(hidden)]
    fn position(&self) -> Position<'_>;
}

impl Index for usize {
    #[inline]
    fn position(&self) -> Position<'_> {
        Position::Element(*self)
    }
}

impl Index for str {
    #[inline]
    fn position(&self) -> Position<'_> {
        Position::Key(self)
    }
}

impl Index for String {
    #[inline]
    fn position(&self) -> Position<'_> {
        Position::Key(self)
    }
}

impl<T: ?Sized + Index> Index for &T {
    #[inline]
    fn position(&self) -> Position<'_> {
        (**self).position()
    }
}
