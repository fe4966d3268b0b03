//! Reusable position and color vertex buffers.
//!
//! Both buffers are transient: every upload replaces the whole content,
//! so they can be reused across strictly sequential draws without any
//! growth or partial-update strategy.

use super::backend::{BufferUsage, GraphicsBackend};
use crate::error::RenderError;
use crate::geometry::{COLOR_COMPONENTS, POSITION_COMPONENTS};

/// Owns the position and color array buffers.
pub struct GeometryUploader<B: GraphicsBackend> {
    position: B::Buffer,
    color: B::Buffer,
}

impl<B: GraphicsBackend> GeometryUploader<B> {
    /// Allocates both buffers.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Resource` if the context cannot allocate a
    /// buffer; an already allocated one is released first.
    pub fn new(gl: &B) -> Result<Self, RenderError> {
        let position = gl.create_buffer().map_err(RenderError::Resource)?;
        let color = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                gl.delete_buffer(position);
                return Err(RenderError::Resource(e));
            }
        };
        Ok(Self { position, color })
    }

    pub fn position_buffer(&self) -> B::Buffer {
        self.position
    }

    pub fn color_buffer(&self) -> B::Buffer {
        self.color
    }

    /// Replaces the position buffer with interleaved X, Y floats and leaves
    /// it bound.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Resource` if `xy` is empty or not a multiple
    /// of two; nothing is uploaded in that case.
    pub fn upload_positions(&self, gl: &B, xy: &[f32]) -> Result<(), RenderError> {
        upload(gl, self.position, xy, POSITION_COMPONENTS, "position")
    }

    /// Replaces the color buffer with interleaved R, G, B, A floats and
    /// leaves it bound.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Resource` if `rgba` is empty or not a multiple
    /// of four.
    pub fn upload_colors(&self, gl: &B, rgba: &[f32]) -> Result<(), RenderError> {
        upload(gl, self.color, rgba, COLOR_COMPONENTS, "color")
    }

    /// Deletes both buffers.
    pub fn destroy(self, gl: &B) {
        gl.delete_buffer(self.position);
        gl.delete_buffer(self.color);
    }
}

fn upload<B: GraphicsBackend>(
    gl: &B,
    buffer: B::Buffer,
    data: &[f32],
    components: usize,
    stream: &str,
) -> Result<(), RenderError> {
    if data.is_empty() || data.len() % components != 0 {
        return Err(RenderError::Resource(format!(
            "{stream} stream length {} is not a positive multiple of {components}",
            data.len()
        )));
    }
    gl.bind_array_buffer(Some(buffer));
    gl.array_buffer_data(data, BufferUsage::DynamicDraw);
    log::trace!("uploaded {} {stream} vertices", data.len() / components);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::software::{Command, SoftwareBackend};
    use crate::surface::SurfaceSize;

    fn backend() -> SoftwareBackend {
        SoftwareBackend::new(SurfaceSize::new(4, 4).unwrap())
    }

    #[test]
    fn new_allocates_two_distinct_buffers() {
        let gl = backend();
        let uploader = GeometryUploader::new(&gl).unwrap();
        assert_eq!(gl.live_buffers(), 2);
        assert_ne!(uploader.position_buffer(), uploader.color_buffer());
    }

    #[test]
    fn upload_positions_replaces_whole_buffer() {
        let gl = backend();
        let uploader = GeometryUploader::new(&gl).unwrap();
        uploader
            .upload_positions(&gl, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .unwrap();
        uploader.upload_positions(&gl, &[5.0, 6.0]).unwrap();
        assert_eq!(gl.buffer_contents(uploader.position_buffer()), vec![5.0, 6.0]);
    }

    #[test]
    fn uploads_are_marked_dynamic() {
        let gl = backend();
        let uploader = GeometryUploader::new(&gl).unwrap();
        uploader.upload_colors(&gl, &[1.0, 0.0, 0.0, 1.0]).unwrap();
        let usage = gl.commands().into_iter().find_map(|c| match c {
            Command::BufferData { usage, .. } => Some(usage),
            _ => None,
        });
        assert_eq!(usage, Some(BufferUsage::DynamicDraw));
    }

    #[test]
    fn odd_position_stream_is_rejected_without_upload() {
        let gl = backend();
        let uploader = GeometryUploader::new(&gl).unwrap();
        let err = uploader.upload_positions(&gl, &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.to_string().contains("position"), "got: {err}");
        assert!(gl.buffer_contents(uploader.position_buffer()).is_empty());
    }

    #[test]
    fn color_stream_must_be_multiple_of_four() {
        let gl = backend();
        let uploader = GeometryUploader::new(&gl).unwrap();
        assert!(uploader.upload_colors(&gl, &[1.0; 6]).is_err());
        assert!(uploader.upload_colors(&gl, &[]).is_err());
        assert!(uploader.upload_colors(&gl, &[1.0; 8]).is_ok());
    }

    #[test]
    fn destroy_releases_both_buffers() {
        let gl = backend();
        let uploader = GeometryUploader::new(&gl).unwrap();
        uploader.destroy(&gl);
        assert_eq!(gl.live_buffers(), 0);
    }

    #[test]
    fn failed_second_allocation_releases_the_first() {
        let gl = backend();
        gl.limit_buffers(1);
        let err = GeometryUploader::new(&gl).err().unwrap();
        assert!(matches!(err, RenderError::Resource(_)), "got: {err}");
        assert_eq!(gl.live_buffers(), 0);
    }
}
