//! Composable predicates.

use std::marker::PhantomData;

/// A predicate over values of type `T`
pub trait Spec<T: ?Sized> {
    fn accept(&self, value: &T) -> bool;
}

impl<T: ?Sized, S: Spec<T>> Spec<T> for &S {
    fn accept(&self, value: &T) -> bool {
        (*self).accept(value)
    }
}

/// Combinators over specs
pub trait SpecExt<T: ?Sized>: Spec<T> + Sized {
    /// Accepts only values both specs accept
    fn and<S: Spec<T>>(self, other: S) -> AndSpec<T, Self, S> {
        AndSpec::new(self, other)
    }
}

impl<T: ?Sized, S: Spec<T>> SpecExt<T> for S {}

pub struct AndSpec<T: ?Sized, F1: Spec<T>, F2: Spec<T>> {
    func1: F1,
    func2: F2,
    _type: PhantomData<fn(&T)>,
}

impl<T: ?Sized, F1: Spec<T>, F2: Spec<T>> AndSpec<T, F1, F2> {
    pub fn new(func1: F1, func2: F2) -> Self {
        Self {
            func1,
            func2,
            _type: PhantomData,
        }
    }
}

impl<T: ?Sized, F1: Spec<T>, F2: Spec<T>> Spec<T> for AndSpec<T, F1, F2> {
    fn accept(&self, value: &T) -> bool {
        self.func1.accept(value) && self.func2.accept(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Even;

    impl Spec<i32> for Even {
        fn accept(&self, value: &i32) -> bool {
            value % 2 == 0
        }
    }

    struct Positive;

    impl Spec<i32> for Positive {
        fn accept(&self, value: &i32) -> bool {
            *value > 0
        }
    }

    #[test]
    fn and_requires_both() {
        let spec = Even.and(Positive);
        assert!(spec.accept(&4));
        assert!(!spec.accept(&-4));
        assert!(!spec.accept(&3));
    }

    #[test]
    fn borrowed_specs_combine() {
        let even = Even;
        let spec = (&even).and(&Positive);
        assert!(spec.accept(&2));
        assert!(!spec.accept(&0));
    }
}
