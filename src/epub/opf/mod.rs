//! OPF（Open Packaging Format）包文档生成模块
//!
//! 此模块生成EPUB中的OPF包文档，包括元数据、清单、脊柱和导览（guide）四部分。

mod guide;
mod manifest;
mod metadata;
mod package;
mod spine;

pub use guide::{GuideReference, guide_references};
pub use manifest::{ManifestItem, manifest_items};
pub use metadata::{Creator, DC_NS, Identifier, UNIQUE_IDENTIFIER_ID};
pub use package::{OPF_NS, OPF_VERSION, package_document};
pub use spine::{SpineItem, spine_items};
