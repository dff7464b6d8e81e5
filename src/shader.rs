use glium::{program, program::ProgramChooserCreationError, Display, Program};
use glutin::surface::WindowSurface;

/// Per-vertex coloured geometry: the plane, propellers, grid and axes.
///
/// Lighting can be switched off with `u_lighting` for the flat reference grid, and `u_fog`
/// blends towards `u_fog_color` with distance from the eye.
///
/// # Errors
///
/// Compile or link failures from the driver.
pub fn colored(display: &Display<WindowSurface>) -> Result<Program, ProgramChooserCreationError> {
    program! (display,
        140 => { vertex: "
                    #version 140

                    uniform mat4 persp_matrix;
                    uniform mat4 view_matrix;
                    uniform mat4 model_matrix;

                    in vec3 position;
                    in vec3 normal;
                    in vec4 color;

                    out vec3 v_position;
                    out vec3 v_normal;
                    out vec4 v_color;
                    out float v_depth;

                    void main() {
                        vec4 world = model_matrix * vec4(position, 1.0);
                        vec4 eye = view_matrix * world;
                        v_position = world.xyz;
                        v_normal = mat3(model_matrix) * normal;
                        v_color = color;
                        v_depth = length(eye.xyz);
                        gl_Position = persp_matrix * eye;
                    }
                ",

        fragment: "
                    #version 140

                    in vec3 v_position;
                    in vec3 v_normal;
                    in vec4 v_color;
                    in float v_depth;
                    out vec4 f_color;

                    uniform vec3 u_light;
                    uniform bool u_lighting;
                    uniform bool u_fog;
                    uniform vec4 u_fog_color;
                    uniform float u_fog_density;

                    const float ambient = 0.2;

                    void main() {
                        vec3 color = v_color.rgb;
                        if (u_lighting) {
                            vec3 to_light = normalize(u_light - v_position);
                            float lum = max(dot(normalize(v_normal), to_light), 0.0);
                            color *= ambient + (1.0 - ambient) * lum;
                        }
                        if (u_fog) {
                            float visibility = clamp(exp(-u_fog_density * v_depth), 0.0, 1.0);
                            color = mix(u_fog_color.rgb, color, visibility);
                        }
                        f_color = vec4(color, v_color.a);
                    }
                ",
    })
}

/// Sea, sky and mountains. With `u_textured` off the surface is filled with `u_color`.
///
/// # Errors
///
/// Compile or link failures from the driver.
pub fn textured(display: &Display<WindowSurface>) -> Result<Program, ProgramChooserCreationError> {
    program! (display,
        140 => { vertex: "
                    #version 140

                    uniform mat4 persp_matrix;
                    uniform mat4 view_matrix;
                    uniform mat4 model_matrix;

                    in vec3 position;
                    in vec3 normal;
                    in vec2 tex_coords;

                    out vec3 v_position;
                    out vec3 v_normal;
                    out vec2 v_tex_coords;
                    out float v_depth;

                    void main() {
                        vec4 world = model_matrix * vec4(position, 1.0);
                        vec4 eye = view_matrix * world;
                        v_position = world.xyz;
                        v_normal = mat3(model_matrix) * normal;
                        v_tex_coords = tex_coords;
                        v_depth = length(eye.xyz);
                        gl_Position = persp_matrix * eye;
                    }
                ",

        fragment: "
                    #version 140

                    in vec3 v_position;
                    in vec3 v_normal;
                    in vec2 v_tex_coords;
                    in float v_depth;
                    out vec4 f_color;

                    uniform vec3 u_light;
                    uniform bool u_lighting;
                    uniform bool u_textured;
                    uniform sampler2D diffuse_tex;
                    uniform vec4 u_color;
                    uniform bool u_fog;
                    uniform vec4 u_fog_color;
                    uniform float u_fog_density;

                    const float ambient = 0.3;

                    void main() {
                        vec3 color = u_textured ? texture(diffuse_tex, v_tex_coords).rgb : u_color.rgb;
                        if (u_lighting) {
                            vec3 to_light = normalize(u_light - v_position);
                            float lum = max(dot(normalize(v_normal), to_light), 0.0);
                            color *= ambient + (1.0 - ambient) * lum;
                        }
                        if (u_fog) {
                            float visibility = clamp(exp(-u_fog_density * v_depth), 0.0, 1.0);
                            color = mix(u_fog_color.rgb, color, visibility);
                        }
                        f_color = vec4(color, 1.0);
                    }
                ",
    })
}
