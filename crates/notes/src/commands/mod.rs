//! Command implementations

pub mod lint;
pub mod precommit;
pub mod sidebar;
pub mod sitemap;
pub mod stamp;
pub mod tree;
pub mod website;

pub use lint::lint_collection;
pub use precommit::precommit;
pub use sidebar::print_sidebar;
pub use sitemap::write_sitemap;
pub use stamp::stamp_notes;
pub use tree::write_tree;
pub use website::write_website;

use std::path::Path;

/// Path for display, relative to the notes root when possible
fn display_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.display().to_string()
}
