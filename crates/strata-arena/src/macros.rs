//! The record registration macro.

/// Define a struct and register it as a [`Record`](crate::Record).
///
/// ```
/// strata_arena::soa_record! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Person {
///         pub name: String,
///         pub age: u32,
///     }
/// }
///
/// let mut people = strata_arena::SoaVec::<Person>::new();
/// people.emplace(("Bob".to_string(), 12));
/// assert_eq!(people.field::<1>().as_slice(), &[12]);
/// ```
///
/// Besides the struct itself this generates `PersonRef<'a>`,
/// `PersonMut<'a>`, `PersonColumns<'a>` and `PersonColumnsMut<'a>`, each
/// with one public-as-declared member per field, named after the field.
///
/// Registration fails to compile when the struct has more than
/// [`MAX_FIELDS`](strata_core::MAX_FIELDS) fields or a field aligned above
/// [`BASELINE_ALIGN`](strata_core::BASELINE_ALIGN). The struct must not
/// implement `Drop`, since records are taken apart field by field. The
/// expansion contains `unsafe` code, so it cannot be used in a crate that
/// forbids `unsafe_code`.
///
/// A field aligned above the baseline is rejected:
///
/// ```compile_fail
/// #[repr(align(64))]
/// pub struct CacheLine([u8; 64]);
///
/// strata_arena::soa_record! {
///     pub struct Padded {
///         pub line: CacheLine,
///         pub id: u32,
///     }
/// }
/// ```
///
/// So is an eleventh field:
///
/// ```compile_fail
/// strata_arena::soa_record! {
///     pub struct Eleven {
///         pub a: u8, pub b: u8, pub c: u8, pub d: u8, pub e: u8, pub f: u8,
///         pub g: u8, pub h: u8, pub i: u8, pub j: u8, pub k: u8,
///     }
/// }
/// ```
///
/// Copying needs every field to be `Clone`:
///
/// ```compile_fail
/// pub struct Handle(u32);
///
/// strata_arena::soa_record! {
///     pub struct Owner {
///         pub handle: Handle,
///         pub id: u32,
///     }
/// }
///
/// let owners = strata_arena::SoaVec::<Owner>::new();
/// let _copy = owners.clone();
/// ```
///
/// ```compile_fail
/// use strata_arena::RecordRef;
///
/// pub struct Handle(u32);
///
/// strata_arena::soa_record! {
///     pub struct Owner {
///         pub handle: Handle,
///         pub id: u32,
///     }
/// }
///
/// let mut owners = strata_arena::SoaVec::<Owner>::new();
/// owners.push(Owner { handle: Handle(1), id: 1 });
/// let _owned = owners.at(0).unwrap().to_record();
/// ```
///
/// ```compile_fail
/// pub struct Handle(u32);
///
/// strata_arena::soa_record! {
///     pub struct Owner {
///         pub handle: Handle,
///         pub id: u32,
///     }
/// }
///
/// let mut owners = strata_arena::SoaVec::<Owner>::new();
/// owners.push(Owner { handle: Handle(1), id: 1 });
/// owners.resize(3, Owner { handle: Handle(2), id: 2 });
/// ```
///
/// and filling with defaults needs every field to be `Default`:
///
/// ```compile_fail
/// pub struct Handle(u32);
///
/// strata_arena::soa_record! {
///     pub struct Owner {
///         pub handle: Handle,
///         pub id: u32,
///     }
/// }
///
/// let mut owners = strata_arena::SoaVec::<Owner>::new();
/// owners.resize_default(3);
/// ```
#[macro_export]
macro_rules! soa_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )+
        }

        $crate::__private::paste::paste! {
            #[doc = concat!("Shared proxy for one [`", stringify!($name), "`] stored column-wise.")]
            #[allow(missing_docs)]
            #[derive(Clone, Copy)]
            $vis struct [<$name Ref>]<'a> {
                $($fvis $field: &'a $ty,)+
            }

            #[doc = concat!("Mutable proxy for one [`", stringify!($name), "`] stored column-wise.")]
            #[allow(missing_docs)]
            $vis struct [<$name Mut>]<'a> {
                $($fvis $field: &'a mut $ty,)+
            }

            #[doc = concat!("Every field view of a [`", stringify!($name), "`] container.")]
            #[allow(missing_docs)]
            #[derive(Clone, Copy)]
            $vis struct [<$name Columns>]<'a> {
                $($fvis $field: $crate::FieldView<'a, $ty>,)+
            }

            #[doc = concat!("Every mutable field view of a [`", stringify!($name), "`] container.")]
            #[allow(missing_docs)]
            $vis struct [<$name ColumnsMut>]<'a> {
                $($fvis $field: $crate::FieldViewMut<'a, $ty>,)+
            }

            const _: &[$crate::__private::FieldType] =
                <($($ty,)+) as $crate::FieldTuple>::TYPES;

            #[allow(unsafe_code)]
            unsafe impl $crate::Record for $name {
                type Fields = ($($ty,)+);
                type Ref<'a> = [<$name Ref>]<'a>;
                type Mut<'a> = [<$name Mut>]<'a>;
                type Columns<'a> = [<$name Columns>]<'a>;
                type ColumnsMut<'a> = [<$name ColumnsMut>]<'a>;

                const NAME: &'static str = stringify!($name);
                const NAMES: &'static [&'static str] = &[$(stringify!($field)),+];
                const LABELS: &'static [&'static str] =
                    &[$(concat!(stringify!($name), ".", stringify!($field))),+];

                #[inline]
                fn into_fields(self) -> Self::Fields {
                    let Self { $($field),+ } = self;
                    ($($field,)+)
                }

                #[inline]
                fn from_fields(fields: Self::Fields) -> Self {
                    let ($($field,)+) = fields;
                    Self { $($field),+ }
                }

                #[inline]
                fn field_refs(&self) -> $crate::RefsOf<'_, Self> {
                    ($(&self.$field,)+)
                }

                #[inline]
                unsafe fn proxy<'a>(ptrs: $crate::PtrsOf<Self>, index: usize) -> Self::Ref<'a> {
                    let ($($field,)+) = ptrs;
                    // SAFETY: slot `index` of every segment is live for 'a.
                    unsafe {
                        [<$name Ref>] {
                            $($field: &*$field.as_ptr().add(index),)+
                        }
                    }
                }

                #[inline]
                unsafe fn proxy_mut<'a>(ptrs: $crate::PtrsOf<Self>, index: usize) -> Self::Mut<'a> {
                    let ($($field,)+) = ptrs;
                    // SAFETY: slot `index` of every segment is live and
                    // unaliased for 'a; segments never overlap.
                    unsafe {
                        [<$name Mut>] {
                            $($field: &mut *$field.as_ptr().add(index),)+
                        }
                    }
                }

                unsafe fn columns<'a>(ptrs: $crate::PtrsOf<Self>, len: usize) -> Self::Columns<'a> {
                    let ($($field,)+) = ptrs;
                    // SAFETY: slots 0..len of every segment are live for 'a.
                    unsafe {
                        [<$name Columns>] {
                            $($field: $crate::FieldView::from_raw_parts(
                                concat!(stringify!($name), ".", stringify!($field)),
                                $field.as_ptr(),
                                len,
                            ),)+
                        }
                    }
                }

                unsafe fn columns_mut<'a>(
                    ptrs: $crate::PtrsOf<Self>,
                    len: usize,
                ) -> Self::ColumnsMut<'a> {
                    let ($($field,)+) = ptrs;
                    // SAFETY: slots 0..len of every segment are live and
                    // unaliased for 'a; segments never overlap.
                    unsafe {
                        [<$name ColumnsMut>] {
                            $($field: $crate::FieldViewMut::from_raw_parts(
                                concat!(stringify!($name), ".", stringify!($field)),
                                $field.as_ptr(),
                                len,
                            ),)+
                        }
                    }
                }
            }

            impl<'a> $crate::RecordRef<'a> for [<$name Ref>]<'a> {
                type Record = $name;

                #[inline]
                fn field_refs(self) -> $crate::RefsOf<'a, $name> {
                    ($(self.$field,)+)
                }
            }

            impl<'a> $crate::RecordMut<'a> for [<$name Mut>]<'a> {
                type Record = $name;

                fn assign(&mut self, value: $name) {
                    let $name { $($field),+ } = value;
                    $(*self.$field = $field;)+
                }

                fn replace(&mut self, value: $name) -> $name {
                    let $name { $($field),+ } = value;
                    $name {
                        $($field: ::core::mem::replace(&mut *self.$field, $field),)+
                    }
                }

                #[inline]
                fn field_refs(&self) -> $crate::RefsOf<'_, $name> {
                    ($(&*self.$field,)+)
                }
            }
        }
    };
}
