pub mod clock;
pub mod config;
pub mod constants;
pub mod countdown;
pub mod engagement;
pub mod error;
pub mod gate;
pub mod particles;
pub mod router;
pub mod sim;
pub mod style;
pub mod tracks;
pub mod warp;

pub use clock::*;
pub use config::*;
pub use countdown::*;
pub use engagement::*;
pub use error::*;
pub use gate::*;
pub use particles::*;
pub use router::*;
pub use sim::*;
pub use style::*;
pub use tracks::*;
pub use warp::*;
