//! The pre-compilation validation pass

use std::fmt::{Debug, Display};

/// Pre-compilation validation of tables.
///
/// Many requirements on table data are awkward to encode in the type system,
/// such as requiring certain arrays to have equal lengths. These requirements
/// are checked before anything is written.
pub trait Validate {
    /// Ensure that this table is well-formed, reporting any errors.
    fn validate(&self) -> Result<(), ValidationReport> {
        let mut ctx = ValidationCtx::default();
        self.validate_impl(&mut ctx);
        if ctx.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { errors: ctx.errors })
        }
    }

    /// Validate this table.
    ///
    /// Implementations should look something like:
    ///
    /// ```rust
    /// # use sfnt_codec::validate::{Validate, ValidationCtx};
    /// struct MyRecord {
    ///     my_values: Vec<u16>,
    /// }
    ///
    /// impl Validate for MyRecord {
    ///     fn validate_impl(&self, ctx: &mut ValidationCtx) {
    ///         ctx.in_table("MyRecord", |ctx| {
    ///             ctx.in_field("my_values", |ctx| {
    ///                 if self.my_values.len() > (u16::MAX as usize) {
    ///                     ctx.report("array is too long");
    ///                 }
    ///             })
    ///         })
    ///     }
    /// }
    /// ```
    fn validate_impl(&self, ctx: &mut ValidationCtx);
}

/// A context for collecting validation errors.
///
/// This tracks the position in the tree at which a given error is reported,
/// via calls to methods like [in_table][Self::in_table] and
/// [in_field][Self::in_field].
#[derive(Clone, Debug, Default)]
pub struct ValidationCtx {
    cur_location: Vec<LocationElem>,
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidationError {
    error: String,
    location: Vec<LocationElem>,
}

/// One or more validation errors.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LocationElem {
    Table(&'static str),
    Field(&'static str),
    Index(usize),
}

impl ValidationCtx {
    /// Run the provided closure in the context of a new table.
    pub fn in_table(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Table(name), f);
    }

    /// Run the provided closure in the context of a new field.
    pub fn in_field(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Field(name), f);
    }

    /// Run the provided closure once per item, recording each item's index.
    pub fn in_array<T>(&mut self, items: &[T], mut f: impl FnMut(&mut ValidationCtx, &T)) {
        for (i, item) in items.iter().enumerate() {
            self.with_elem(LocationElem::Index(i), |ctx| f(ctx, item));
        }
    }

    /// Report a new error, associating it with the current path.
    pub fn report(&mut self, msg: impl Display) {
        self.errors.push(ValidationError {
            location: self.cur_location.clone(),
            error: msg.to_string(),
        });
    }

    fn with_elem(&mut self, elem: LocationElem, f: impl FnOnce(&mut ValidationCtx)) {
        self.cur_location.push(elem);
        f(self);
        self.cur_location.pop();
    }
}

impl ValidationReport {
    /// The error messages, without location information.
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.errors.iter().map(|e| e.error.as_str())
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let [error] = self.errors.as_slice() {
            return writeln!(f, "Validation error:\n{error}");
        }

        writeln!(f, "{} validation errors:", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "#{}\n{error}", i + 1)?;
        }
        Ok(())
    }
}

impl Debug for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl std::error::Error for ValidationReport {}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\"{}\"", self.error)?;
        let mut depth = 0;
        for (i, elem) in self.location.iter().enumerate() {
            match elem {
                LocationElem::Table(name) if i == 0 => write!(f, "in: {name}"),
                LocationElem::Table(name) => {
                    depth += 1;
                    write!(f, "\n{:indent$}{name}", "", indent = depth * 2)
                }
                LocationElem::Field(name) => write!(f, ".{name}"),
                LocationElem::Index(idx) => write!(f, "[{idx}]"),
            }?;
        }
        writeln!(f)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_array(self, |ctx, item| item.validate_impl(ctx))
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        if let Some(item) = self {
            item.validate_impl(ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Outer {
        inner: Vec<Inner>,
    }

    struct Inner(u16);

    impl Validate for Outer {
        fn validate_impl(&self, ctx: &mut ValidationCtx) {
            ctx.in_table("Outer", |ctx| {
                ctx.in_field("inner", |ctx| self.inner.validate_impl(ctx))
            })
        }
    }

    impl Validate for Inner {
        fn validate_impl(&self, ctx: &mut ValidationCtx) {
            ctx.in_table("Inner", |ctx| {
                if self.0 == 0 {
                    ctx.report("must be nonzero");
                }
            })
        }
    }

    #[test]
    fn report_includes_path() {
        let table = Outer {
            inner: vec![Inner(1), Inner(0)],
        };
        let report = table.validate().unwrap_err();
        assert_eq!(report.messages().collect::<Vec<_>>(), ["must be nonzero"]);
        let text = report.to_string();
        assert!(text.contains("in: Outer.inner[1]"), "{text}");
    }
}
