//! glTF binary model loading.
//!
//! Models are not remediated: the pipeline loads them and hands them to the
//! scene untouched. Only the vertex data the experience consumes is
//! extracted.

use tracing::debug;

/// A loaded model: the named meshes of one glTF binary file.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub name: String,
    pub meshes: Vec<MeshData>,
}

/// One mesh with its draw primitives.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

/// Raw vertex arrays for a single draw primitive.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub indices: Option<Vec<u32>>,
}

/// Parse a .glb byte buffer into a model asset.
pub fn load_glb(name: &str, bytes: &[u8]) -> Result<ModelAsset, gltf::Error> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;

    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let mesh_name = mesh.name().unwrap_or("unnamed").to_string();
        let mut primitives = Vec::new();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let tex_coords: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().collect());

            let indices: Option<Vec<u32>> = reader
                .read_indices()
                .map(|idx| idx.into_u32().collect());

            primitives.push(Primitive {
                positions,
                normals,
                tex_coords,
                indices,
            });
        }

        meshes.push(MeshData {
            name: mesh_name,
            primitives,
        });
    }

    debug!("model '{}': {} meshes", name, meshes.len());
    Ok(ModelAsset {
        name: name.to_string(),
        meshes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_rejected() {
        assert!(load_glb("door", b"definitely not a glb").is_err());
    }
}
