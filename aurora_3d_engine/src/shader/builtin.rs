//! Built-in GLSL sources for the forward and deferred strategies.
//!
//! Vertex stages contain an `ARMATURE_SUPPORT` block so that the skinned
//! variant is produced by prepending a single define.

pub const PHONG_VERTEX: &str = r#"attribute vec3 aPositionVertex;
attribute vec3 aNormalVertex;
attribute vec2 aTextureVertex;

uniform mat4 uPMatrix;
uniform mat4 uMVMatrix;
uniform mat4 uNMatrix;

#ifdef ARMATURE_SUPPORT
attribute vec4 aBoneIndex;
attribute vec4 aBoneWeight;
uniform mat4 uBoneMatrices[64];
#endif

varying vec2 vKdMapCoord;
varying vec4 vNormal;
varying vec4 vPosition;

void main(void)
{
    vec4 position = vec4(aPositionVertex, 1.0);
    vec4 normal = vec4(aNormalVertex, 0.0);
#ifdef ARMATURE_SUPPORT
    mat4 skin = mat4(0.0);
    mat4 skinNormal = mat4(0.0);
    for (int i = 0; i < 4; ++i)
    {
        int bone = int(aBoneIndex[i]);
        skin += aBoneWeight[i] * uBoneMatrices[bone * 2];
        skinNormal += aBoneWeight[i] * uBoneMatrices[bone * 2 + 1];
    }
    position = skin * position;
    normal = skinNormal * normal;
#endif
    vNormal = uNMatrix * normal;
    vPosition = uMVMatrix * position;
    vKdMapCoord = aTextureVertex;
    gl_Position = uPMatrix * vPosition;
}
"#;

pub const PHONG_FRAGMENT: &str = r#"precision mediump float;

uniform vec4 uKa;
uniform vec4 uKd;
uniform vec4 uKs;
uniform sampler2D uMapKd;
uniform vec2 uMapKdScale;
uniform vec3 uLightPosition0;

varying vec2 vKdMapCoord;
varying vec4 vNormal;
varying vec4 vPosition;

void main(void)
{
    vec3 diffuse = mix(texture2D(uMapKd, vKdMapCoord / uMapKdScale), uKd, uKd.a).xyz;
    vec3 lightDirection = normalize(uLightPosition0 - vPosition.xyz);
    vec3 normal = normalize(vNormal.xyz);
    float diffuseFactor = max(0.0, dot(normal, lightDirection));
    vec3 reflected = reflect(-lightDirection, normal);
    float specular = pow(max(dot(reflected, normalize(-vPosition.xyz)), 0.0), 100.0);
    gl_FragColor = vec4(uKa.xyz + diffuseFactor * diffuse + specular * uKs.xyz, 1.0);
}
"#;

pub const GEOMETRY_PASS_FRAGMENT: &str = r#"#extension GL_EXT_draw_buffers : require
precision mediump float;

uniform vec4 uKd;
uniform sampler2D uMapKd;
uniform vec2 uMapKdScale;

varying vec2 vKdMapCoord;
varying vec4 vNormal;
varying vec4 vPosition;

void main(void)
{
    vec3 diffuse = mix(texture2D(uMapKd, vKdMapCoord / uMapKdScale), uKd, uKd.a).xyz;
    gl_FragData[0] = vec4(vec3(gl_FragCoord.z), 1.0);
    gl_FragData[1] = vec4(normalize(vNormal.xyz), 1.0);
    gl_FragData[2] = vPosition;
    gl_FragData[3] = vec4(diffuse, 1.0);
}
"#;

pub const RESOLVE_VERTEX: &str = r#"attribute vec4 aPositionVertex;
attribute vec2 aTextureVertex;

uniform mat4 uHMatrix;

varying vec2 vTexCoordinate;

void main(void)
{
    vTexCoordinate = aTextureVertex;
    gl_Position = uHMatrix * aPositionVertex;
}
"#;

pub const RESOLVE_FRAGMENT: &str = r#"precision mediump float;

uniform sampler2D uMapKd;
uniform sampler2D uMapRGBDepth;
uniform sampler2D uMapNormal;
uniform sampler2D uMapPosition;
uniform vec3 uLightPosition0;

varying vec2 vTexCoordinate;

void main(void)
{
    vec3 color = texture2D(uMapKd, vTexCoordinate).xyz;
    vec3 normal = normalize(texture2D(uMapNormal, vTexCoordinate).xyz);
    vec3 position = texture2D(uMapPosition, vTexCoordinate).xyz;
    vec3 lightDirection = normalize(uLightPosition0 - position);
    float diffuseFactor = max(0.0, dot(normal, lightDirection));
    float depth = texture2D(uMapRGBDepth, vTexCoordinate).x;
    gl_FragColor = vec4(color * diffuseFactor, step(depth, 0.9999));
}
"#;
