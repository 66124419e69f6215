//! SQLAlchemy 2.x declarative model generator for modelgen.
//!
//! Models use typed `Mapped[...]` annotations with `mapped_column()`.
//! Foreign-key columns stay mapped columns carrying a `ForeignKey`, and each
//! foreign key adds a `relationship()` attribute after the columns.
//!
//! Generated modules import the declarative base from `.base`; the models
//! package is expected to define it:
//!
//! ```python
//! from sqlalchemy.orm import DeclarativeBase
//!
//! class Base(DeclarativeBase):
//!     pass
//! ```

mod dialect;
mod naming;
mod renderer;
mod type_mapper;

pub use dialect::{SQLALCHEMY, SqlAlchemy};
pub use naming::SQLALCHEMY_NAMING;
