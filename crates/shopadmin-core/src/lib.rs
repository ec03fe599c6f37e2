pub mod catalog;
pub mod category;
pub mod diff;
pub mod entity;
pub mod error;
pub mod loading;
pub mod order;
pub mod page;
pub mod reconcile;
pub mod session;
pub mod user;

pub use catalog::{MAX_IMAGES, Product, SIZE_ORDER, Size, Version, sort_sizes};
pub use category::{Category, CategoryCatalog};
pub use diff::{FieldDiffer, Patch};
pub use entity::{ChangeSet, Editable, EntityId, SIZES_FIELD, compute_changes};
pub use error::{CoreError, ErrorCategory, Result};
pub use loading::{LoadingGuard, LoadingTracker};
pub use order::{Order, OrderItem, OrderStatus};
pub use page::{PageRequest, Paginated};
pub use reconcile::{KeyedItem, NestedDiff, reconcile, reconcile_strict};
pub use session::{EditSession, EntityStore, SessionPhase, SubmitOutcome};
pub use user::User;
