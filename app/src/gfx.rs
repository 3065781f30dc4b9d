//! WebGL2 draw layer.
//!
//! One program per effect kind, one shared unit-quad geometry, and one GPU
//! texture per cached URL. Each frame rebuilds every model matrix from the
//! engine's current object state and writes every scalar uniform the
//! material declares; nothing on the GPU side accumulates state between
//! frames except the textures themselves.

use std::collections::HashMap;

use engine::effect::EffectKind;
use engine::engine::EngineCore;
use engine::scene::SceneObject;
use engine::uniforms::{UniformValue, Uniforms};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::loader::{Texture, TextureCache};
use crate::mat::{self, Mat4};

#[derive(Debug, Error)]
pub enum GfxError {
    #[error("webgl2 context unavailable")]
    ContextUnavailable,
    #[error("shader compile failed: {0}")]
    Compile(String),
    #[error("program link failed: {0}")]
    Link(String),
    #[error("gl allocation failed: {0}")]
    Alloc(&'static str),
    #[error("gl call failed: {0}")]
    Js(String),
}

const QUAD_VERT: &str = include_str!("../shaders/quad.vert");
const CYLINDER_FRAG: &str = include_str!("../shaders/cylinder.frag");
const HOVER_FRAG: &str = include_str!("../shaders/hover.frag");
const SCRUB_FRAG: &str = include_str!("../shaders/scrub.frag");

struct ProgramInfo {
    program: WebGlProgram,
    /// Lazily resolved uniform locations; `None` means the shader doesn't
    /// declare the name and writes to it are skipped.
    locations: HashMap<String, Option<WebGlUniformLocation>>,
}

struct GpuTexture {
    texture: WebGlTexture,
    /// Video sources re-upload every frame while the page renders.
    video: bool,
}

pub struct Renderer {
    gl: GL,
    programs: HashMap<EffectKind, ProgramInfo>,
    quad: WebGlVertexArrayObject,
    textures: HashMap<String, GpuTexture>,
}

impl Renderer {
    /// Build the renderer on the given canvas: context, per-effect programs,
    /// and the shared quad geometry.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, GfxError> {
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(js_err)?
            .ok_or(GfxError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| GfxError::ContextUnavailable)?;

        let mut programs = HashMap::new();
        for (kind, frag) in [
            (EffectKind::CylinderSlide, CYLINDER_FRAG),
            (EffectKind::HoverTilt, HOVER_FRAG),
            (EffectKind::ScrollScrub, SCRUB_FRAG),
        ] {
            let program = link_program(&gl, QUAD_VERT, frag)?;
            programs.insert(kind, ProgramInfo { program, locations: HashMap::new() });
        }

        let quad = build_quad(&gl)?;

        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);

        Ok(Self { gl, programs, quad, textures: HashMap::new() })
    }

    /// Create GPU textures for every cached media element not yet uploaded.
    pub fn upload(&mut self, cache: &TextureCache) -> Result<(), GfxError> {
        for (url, texture) in cache.iter() {
            if self.textures.contains_key(url) {
                continue;
            }
            let gpu = self.gl.create_texture().ok_or(GfxError::Alloc("texture"))?;
            self.gl.bind_texture(GL::TEXTURE_2D, Some(&gpu));
            self.gl
                .tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
            self.gl
                .tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
            self.gl
                .tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
            self.gl
                .tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
            let video = upload_media(&self.gl, texture)?;
            self.textures.insert(url.to_owned(), GpuTexture { texture: gpu, video });
        }
        Ok(())
    }

    /// Re-upload every video texture from its element's current frame.
    pub fn refresh_videos(&self, cache: &TextureCache) {
        for (url, gpu) in &self.textures {
            if !gpu.video {
                continue;
            }
            let Some(video) = cache.video(url) else {
                continue;
            };
            // HAVE_CURRENT_DATA and above have a frame to read.
            if video.ready_state() < 2 {
                continue;
            }
            self.gl.bind_texture(GL::TEXTURE_2D, Some(&gpu.texture));
            let _ = self
                .gl
                .tex_image_2d_with_u32_and_u32_and_html_video_element(
                    GL::TEXTURE_2D,
                    0,
                    GL::RGBA as i32,
                    GL::RGBA,
                    GL::UNSIGNED_BYTE,
                    video,
                );
        }
    }

    /// Match the GL viewport to the canvas drawing buffer.
    pub fn set_size(&self, width: u32, height: u32) {
        #[allow(clippy::cast_possible_wrap)]
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Draw one frame of the whole scene.
    pub fn render(&mut self, core: &EngineCore) {
        let vp = core.viewport();
        #[allow(clippy::cast_possible_truncation)]
        let projection = mat::perspective(
            vp.fov_radians as f32,
            vp.aspect as f32,
            vp.near as f32,
            vp.far as f32,
        );
        #[allow(clippy::cast_possible_truncation)]
        let view = mat::translation(0.0, 0.0, -(vp.camera_z as f32));

        self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
        self.gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        self.gl.bind_vertex_array(Some(&self.quad));

        for object in core.objects() {
            self.draw_object(object, &projection, &view);
        }
    }

    fn draw_object(&mut self, object: &SceneObject, projection: &Mat4, view: &Mat4) {
        let Some(info) = self.programs.get_mut(&object.kind) else {
            return;
        };
        self.gl.use_program(Some(&info.program));
        set_matrix(&self.gl, info, "uProjection", projection);
        set_matrix(&self.gl, info, "uView", view);

        #[allow(clippy::cast_possible_truncation)]
        let (pos_x, pos_y) = (object.position.x as f32, object.position.y as f32);
        #[allow(clippy::cast_possible_truncation)]
        let (width, height) = (object.geometry.width() as f32, object.geometry.height() as f32);

        if let Some(slide) = object.slide.as_ref() {
            // Planes hang off a group centered on the cylinder axis; the
            // shared spin plus each plane's resting yaw places them.
            #[allow(clippy::cast_possible_truncation)]
            let (spin, radius, group_z) =
                (slide.spin() as f32, object.radius() as f32, object.group_z() as f32);
            for plane in &object.planes {
                #[allow(clippy::cast_possible_truncation)]
                let yaw = plane.yaw as f32;
                let model = mat::multiply(
                    &mat::translation(pos_x, pos_y, group_z),
                    &mat::multiply(
                        &mat::rotation_y(spin + yaw),
                        &mat::multiply(
                            &mat::translation(0.0, 0.0, radius),
                            &mat::scaling(width, height, 1.0),
                        ),
                    ),
                );
                set_matrix(&self.gl, info, "uModel", &model);
                apply_uniforms(&self.gl, info, &object.uniforms);
                apply_uniforms(&self.gl, info, &plane.uniforms);
                bind_texture(&self.gl, &self.textures, info, 0, "uTex1", &plane.texture.url);
                self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
            }
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let (tilt_x, tilt_y) = (object.hover.tilt_x as f32, object.hover.tilt_y as f32);
            let model = mat::multiply(
                &mat::translation(pos_x, pos_y, 0.0),
                &mat::multiply(
                    &mat::rotation_x(tilt_x),
                    &mat::multiply(&mat::rotation_y(tilt_y), &mat::scaling(width, height, 1.0)),
                ),
            );
            set_matrix(&self.gl, info, "uModel", &model);
            apply_uniforms(&self.gl, info, &object.uniforms);
            for (unit, binding) in object.textures.iter().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let unit = unit as u32;
                bind_texture(&self.gl, &self.textures, info, unit, &binding.uniform, &binding.url);
            }
            self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        }
    }

}

fn bind_texture(
    gl: &GL,
    textures: &HashMap<String, GpuTexture>,
    info: &mut ProgramInfo,
    unit: u32,
    uniform: &str,
    url: &str,
) {
    let Some(gpu) = textures.get(url) else {
        return;
    };
    gl.active_texture(GL::TEXTURE0 + unit);
    gl.bind_texture(GL::TEXTURE_2D, Some(&gpu.texture));
    if let Some(loc) = location(gl, info, uniform) {
        #[allow(clippy::cast_possible_wrap)]
        gl.uniform1i(Some(loc), unit as i32);
    }
}

fn upload_media(gl: &GL, texture: &Texture) -> Result<bool, GfxError> {
    match texture {
        Texture::Image(image) => {
            gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                image,
            )
            .map_err(js_err)?;
            Ok(false)
        }
        Texture::Video(video) => {
            if video.ready_state() >= 2 {
                gl.tex_image_2d_with_u32_and_u32_and_html_video_element(
                    GL::TEXTURE_2D,
                    0,
                    GL::RGBA as i32,
                    GL::RGBA,
                    GL::UNSIGNED_BYTE,
                    video,
                )
                .map_err(js_err)?;
            }
            Ok(true)
        }
    }
}

/// Resolve a uniform location through the program's cache.
fn location<'a>(gl: &GL, info: &'a mut ProgramInfo, name: &str) -> Option<&'a WebGlUniformLocation> {
    let ProgramInfo { program, locations } = info;
    locations
        .entry(name.to_owned())
        .or_insert_with(|| gl.get_uniform_location(program, name))
        .as_ref()
}

fn set_matrix(gl: &GL, info: &mut ProgramInfo, name: &str, matrix: &Mat4) {
    if let Some(loc) = location(gl, info, name) {
        gl.uniform_matrix4fv_with_f32_array(Some(loc), false, matrix);
    }
}

/// Write every scalar uniform the shader declares; undeclared names skip.
fn apply_uniforms(gl: &GL, info: &mut ProgramInfo, uniforms: &Uniforms) {
    for (name, value) in uniforms.iter() {
        if let Some(loc) = location(gl, info, name) {
            match value {
                #[allow(clippy::cast_possible_truncation)]
                UniformValue::Float(v) => gl.uniform1f(Some(loc), v as f32),
                UniformValue::Int(v) => gl.uniform1i(Some(loc), v),
            }
        }
    }
}

/// Interleaved unit quad: position in [-0.5, 0.5], uv in [0, 1].
fn build_quad(gl: &GL) -> Result<WebGlVertexArrayObject, GfxError> {
    let vao = gl.create_vertex_array().ok_or(GfxError::Alloc("vertex array"))?;
    gl.bind_vertex_array(Some(&vao));

    let buffer = gl.create_buffer().ok_or(GfxError::Alloc("buffer"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));

    #[rustfmt::skip]
    let vertices: [f32; 16] = [
        -0.5, -0.5, 0.0, 0.0,
         0.5, -0.5, 1.0, 0.0,
        -0.5,  0.5, 0.0, 1.0,
         0.5,  0.5, 1.0, 1.0,
    ];
    let data = js_sys::Float32Array::from(vertices.as_slice());
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);

    let stride = 4 * 4;
    gl.vertex_attrib_pointer_with_i32(0, 2, GL::FLOAT, false, stride, 0);
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_with_i32(1, 2, GL::FLOAT, false, stride, 2 * 4);
    gl.enable_vertex_attrib_array(1);

    Ok(vao)
}

fn link_program(gl: &GL, vert: &str, frag: &str) -> Result<WebGlProgram, GfxError> {
    let vert = compile_shader(gl, GL::VERTEX_SHADER, vert)?;
    let frag = compile_shader(gl, GL::FRAGMENT_SHADER, frag)?;

    let program = gl.create_program().ok_or(GfxError::Alloc("program"))?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(GfxError::Link(log))
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, GfxError> {
    let shader = gl.create_shader(kind).ok_or(GfxError::Alloc("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        Err(GfxError::Compile(log))
    }
}

fn js_err(value: JsValue) -> GfxError {
    GfxError::Js(format!("{value:?}"))
}
