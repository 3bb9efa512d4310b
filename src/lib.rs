//! First-person character controller with an optional stalker mode.
//! Re-exports the composition root and its collaborators for the simulator
//! binary and tests.
pub mod animation;
pub mod chase;
pub mod combat;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod ground;
pub mod input;
pub mod logging;
pub mod look;
pub mod motion;
pub mod physics;
pub mod player;
pub mod view;

// Re-export commonly used items
pub use animation::{AnimBool, AnimFloat, AnimTrigger, AnimationDriver, AnimatorState};
pub use chase::{ChaseEvent, ChaseFlags, ChasePhase, ChaseSequence};
pub use config::{Capabilities, ControllerConfig};
pub use controller::{CharacterController, ControllerBuilder, TickReport};
pub use error::{ConfigError, PhysicsError};
pub use game::GameState;
pub use input::{Action, Axis, Binding, CursorState, InputSource, InputState, KeyBindings};
pub use logging::init as init_logging;
pub use physics::{LayerMask, PhysicsEngine, PhysicsWorld};
pub use player::CharacterBody;
pub use view::{BodyMesh, CameraRig, ViewModeManager};
