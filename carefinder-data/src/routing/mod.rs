//! Driving directions from the Directions web service.
//!
//! [`HttpRouter`] implements [`carefinder_core::Router`] on top of the same
//! transport as [`crate::HttpGeocoder`]. Step instructions arrive as HTML
//! fragments and are flattened with [`strip_html`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use carefinder_core::Router;
//! use carefinder_data::{HttpRouter, MapsConfig};
//! use geo::Coord;
//!
//! let config = MapsConfig::default()
//!     .with_api_key("YOUR_KEY")
//!     .with_timeout(Duration::from_secs(10));
//! let router = HttpRouter::with_config(config)?;
//! let route = router.route(Coord { x: 3.3792, y: 6.5244 }, Coord { x: 3.3515, y: 6.6018 })?;
//! if let Some(summary) = route {
//!     println!("{} ({})", summary.distance_text, summary.duration_text);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod html;
mod provider;

pub use html::strip_html;
pub use provider::HttpRouter;
