pub mod avatar_lib;
pub mod avatar_renderer;
pub mod people_loader;
pub mod role_colors;

pub use avatar_lib::{generate_avatars, AvatarConfig, DEFAULT_FONT_PATHS};
pub use avatar_renderer::{create_avatar, load_font, render_avatar, AvatarFont, AVATAR_SIZE};
pub use people_loader::{load_avatar_specs, read_avatar_specs, read_avatar_specs_from, AvatarSpec};
pub use role_colors::{colors_for_role, parse_color, Rgb};
