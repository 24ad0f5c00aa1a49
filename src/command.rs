use crate::geom::Region;
use crate::render::TextureHandle;

/// One textured quad for the rendering backend: copy `src` out of `texture`
/// onto `dest` on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    /// Atlas texture.
    pub texture: TextureHandle,
    /// Cell inside the atlas.
    pub src: Region,
    /// Footprint on screen.
    pub dest: Region,
}
