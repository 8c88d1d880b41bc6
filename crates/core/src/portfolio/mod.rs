mod analytics;
mod error;
mod requests;
mod slug;
mod types;
mod validate;

pub use analytics::{compute_analytics, CarouselAnalytics, ItemAnalytics};
pub use error::ValidationError;
pub use requests::{
    CreateCarouselItem, CreateImage, CreateProject, IndexedAttrChanges, ReorderPair,
    UpdateCarouselItem, UpdateImage, UpdateProject,
};
pub use slug::slugify;
pub use types::{CarouselItem, CarouselStatus, Dimensions, Image, LinkType, Project, PublishStatus};
pub use validate::{
    validate_carousel_update, validate_image_update, validate_new_carousel_item,
    validate_new_image, validate_new_project, validate_project_update, validate_reorder_pairs,
};
