//! Tree widgets for the tagpanel file and album views
//!
//! Follows the iced state-struct + view-function split:
//!
//! - **State**: [`TreeModel`] is a node arena with an object → node side-table,
//!   selection, expansion and sort state. Nodes never own domain objects.
//! - **Update**: [`update`] recomputes a node's icon, cells and colors from the
//!   [`Catalog`](tagpanel_core::Catalog); [`reconcile`] patches a node's
//!   children in place so selection and expansion survive model changes.
//! - **View**: [`tree_view`] renders a model as rows for iced.
//!
//! Colors and icons come from an explicit [`StyleContext`].

pub mod reconcile;
pub mod theme;
pub mod tree;
pub mod update;
pub mod view;

pub use reconcile::{append_children, reconcile_children, Reconciled};
pub use theme::{match_bucket, match_color, Icon, StyleContext, MISMATCH_COLOR};
pub use tree::{
    default_comparator, Cell, Comparator, NodeId, Row, SelectModifiers, SortSpec, TreeModel,
    TreeNode,
};
pub use update::{file_icon, update_node, UpdateContext, CLUSTERS_LABEL};
pub use view::{column_width_at, tree_view, TreeMessage, HEADER_LEFT, MIN_COLUMN_WIDTH, ROW_INDENT};
