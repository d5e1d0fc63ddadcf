use nalgebra::{Matrix4, Vector3};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext, WebGlUniformLocation};

use crate::engine::mesh::{Mesh, FLOATS_PER_VERTEX};

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute float aShade;
    uniform mat4 uModel;
    uniform mat4 uViewProjection;
    varying float vShade;
    varying float vDepth;
    void main() {
        vec4 clip = uViewProjection * uModel * vec4(aPosition, 1.0);
        gl_Position = clip;
        vShade = aShade;
        vDepth = clip.w;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying float vShade;
    varying float vDepth;
    uniform vec3 uColor;
    uniform vec3 uFogColor;
    uniform vec2 uFogRange;

    void main() {
        vec3 color = uColor * vShade;
        float fog = clamp((vDepth - uFogRange.x) / (uFogRange.y - uFogRange.x), 0.0, 1.0);
        gl_FragColor = vec4(mix(color, uFogColor, fog), 1.0);
    }
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Box,
    Pyramid,
}

struct GpuMesh {
    vertices: WebGlBuffer,
    indices: WebGlBuffer,
    index_count: i32,
}

/// Position, size, and heading of one drawn shape.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub center: Vector3<f32>,
    pub size: Vector3<f32>,
    pub yaw: f32,
}

impl Placement {
    pub fn new(x: f32, y: f32, z: f32, w: f32, h: f32, d: f32) -> Self {
        Placement {
            center: Vector3::new(x, y, z),
            size: Vector3::new(w, h, d),
            yaw: 0.0,
        }
    }

    pub fn turned(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    fn model(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.center)
            * Matrix4::from_euler_angles(0.0, self.yaw, 0.0)
            * Matrix4::new_nonuniform_scaling(&self.size)
    }
}

pub struct Renderer {
    gl: WebGlRenderingContext,
    program: WebGlProgram,
    model_location: WebGlUniformLocation,
    view_projection_location: WebGlUniformLocation,
    color_location: WebGlUniformLocation,
    fog_color_location: WebGlUniformLocation,
    fog_range_location: WebGlUniformLocation,
    box_mesh: GpuMesh,
    pyramid_mesh: GpuMesh,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let uniform = |name: &str| -> Result<WebGlUniformLocation, JsValue> {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| JsValue::from_str(&format!("Failed to get {} location", name)))
        };
        let model_location = uniform("uModel")?;
        let view_projection_location = uniform("uViewProjection")?;
        let color_location = uniform("uColor")?;
        let fog_color_location = uniform("uFogColor")?;
        let fog_range_location = uniform("uFogRange")?;

        let box_mesh = upload(&gl, &Mesh::unit_box())?;
        let pyramid_mesh = upload(&gl, &Mesh::unit_pyramid())?;

        Ok(Renderer {
            gl,
            program,
            model_location,
            view_projection_location,
            color_location,
            fog_color_location,
            fog_range_location,
            box_mesh,
            pyramid_mesh,
        })
    }

    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.gl.canvas()?.dyn_into::<HtmlCanvasElement>().ok()
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    /// Clears to `sky` and fades geometry into it between `near` and `far`.
    pub fn begin_frame(&self, sky: (f32, f32, f32), near: f32, far: f32, view_projection: &Matrix4<f32>) {
        self.gl.clear_color(sky.0, sky.1, sky.2, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);

        self.gl.uniform3f(Some(&self.fog_color_location), sky.0, sky.1, sky.2);
        self.gl.uniform2f(Some(&self.fog_range_location), near, far);
        self.gl.uniform_matrix4fv_with_f32_array(
            Some(&self.view_projection_location),
            false,
            view_projection.as_slice(),
        );
    }

    pub fn draw(&self, shape: Shape, placement: Placement, color: (f32, f32, f32)) {
        let mesh = match shape {
            Shape::Box => &self.box_mesh,
            Shape::Pyramid => &self.pyramid_mesh,
        };

        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&mesh.vertices));
        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&mesh.indices));

        let stride = (FLOATS_PER_VERTEX * 4) as i32;
        let pos_loc = self.gl.get_attrib_location(&self.program, "aPosition") as u32;
        let shade_loc = self.gl.get_attrib_location(&self.program, "aShade") as u32;
        self.gl.vertex_attrib_pointer_with_i32(pos_loc, 3, WebGlRenderingContext::FLOAT, false, stride, 0);
        self.gl.enable_vertex_attrib_array(pos_loc);
        self.gl.vertex_attrib_pointer_with_i32(shade_loc, 1, WebGlRenderingContext::FLOAT, false, stride, 12);
        self.gl.enable_vertex_attrib_array(shade_loc);

        self.gl.uniform3f(Some(&self.color_location), color.0, color.1, color.2);
        let model = placement.model();
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.model_location), false, model.as_slice());

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.index_count,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
    }
}

fn upload(gl: &WebGlRenderingContext, mesh: &Mesh) -> Result<GpuMesh, JsValue> {
    let vertices = gl.create_buffer().ok_or("Failed to create vertex buffer")?;
    let indices = gl.create_buffer().ok_or("Failed to create index buffer")?;

    gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&vertices));
    // SAFETY: the view is consumed by buffer_data before any allocation can
    // move the wasm memory it points into.
    unsafe {
        let view = js_sys::Float32Array::view(&mesh.vertices);
        gl.buffer_data_with_array_buffer_view(
            WebGlRenderingContext::ARRAY_BUFFER,
            &view,
            WebGlRenderingContext::STATIC_DRAW,
        );
    }

    gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&indices));
    unsafe {
        let view = js_sys::Uint16Array::view(&mesh.indices);
        gl.buffer_data_with_array_buffer_view(
            WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
            &view,
            WebGlRenderingContext::STATIC_DRAW,
        );
    }

    Ok(GpuMesh { vertices, indices, index_count: mesh.index_count() })
}

fn create_program(gl: &WebGlRenderingContext) -> Result<WebGlProgram, JsValue> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program().ok_or("Unable to create program")?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(JsValue::from_str(&gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> Result<web_sys::WebGlShader, JsValue> {
    let shader = gl.create_shader(shader_type).ok_or("Unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(JsValue::from_str(&gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}
