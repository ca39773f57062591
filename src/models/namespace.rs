//! Storage namespaces: disjoint flat directories, one per asset class.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Name of the default placeholder shown for products without pictures.
/// It can never be deleted, whatever namespace it is requested from.
pub const DEFAULT_PLACEHOLDER: &str = "Padrao.jpeg";

/// A storage root scoping one class of assets.
///
/// Names are unique only inside their namespace.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Product,
    Order,
    Profile,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Product, Namespace::Order, Namespace::Profile];

    /// Directory name of the namespace beneath the storage root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Namespace::Product => "product",
            Namespace::Order => "order",
            Namespace::Profile => "profile",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Physical root directory of every namespace.
///
/// Built once from configuration and handed to the store at construction.
#[derive(Clone, Debug)]
pub struct NamespaceRoots {
    product: PathBuf,
    order: PathBuf,
    profile: PathBuf,
}

impl NamespaceRoots {
    /// Lay out the three namespaces as sibling directories of `base`.
    pub fn under(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            product: base.join(Namespace::Product.dir_name()),
            order: base.join(Namespace::Order.dir_name()),
            profile: base.join(Namespace::Profile.dir_name()),
        }
    }

    pub fn root(&self, namespace: Namespace) -> &Path {
        match namespace {
            Namespace::Product => &self.product,
            Namespace::Order => &self.order,
            Namespace::Profile => &self.profile,
        }
    }
}
