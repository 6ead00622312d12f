// Tue Jan 15 2026 - Alex

pub mod error;
pub mod field;
pub mod layout;
pub mod reconstructor;
pub mod settings;
pub mod sorter;
pub mod visitor;

pub use error::StructureError;
pub use field::{CFieldDefinition, FieldDefinition, FieldSettings};
pub use layout::{LayoutItem, LayoutPlanner, UdtLayout};
pub use reconstructor::{HeaderReconstructor, SizeCheck};
pub use settings::{MemberExpansion, ReconstructorSettings};
pub use sorter::{ImageArchitecture, SymbolSorter};
pub use visitor::SymbolVisitor;
