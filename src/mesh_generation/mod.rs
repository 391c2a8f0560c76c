//! Structured block generators producing [`VolumeMesh`]es.
//!
//! All generators lay nodes out on an `(nx+1)×(ny+1)×(nz+1)` lattice over
//! `[min, max]` and return a rebuilt mesh (boundary faces populated, nothing
//! selected).

use crate::mesh::VolumeMesh;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;

/// Optional configuration for mesh generation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshGenerationOptions {
    /// Part id given to every generated element.
    pub part: usize,
}

fn invalid_geometry(message: impl Into<String>) -> MeshError {
    MeshError::InvalidGeometry(message.into())
}

/// Node lattice plus the corner indices of every hex cell of the block.
fn block_lattice(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
) -> Result<(VolumeMesh, Vec<[usize; 8]>), MeshError> {
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(invalid_geometry("nx, ny, and nz must be positive"));
    }
    if (0..3).any(|d| !(max[d] > min[d])) {
        return Err(invalid_geometry("max must exceed min along every axis"));
    }

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let dz = (max[2] - min[2]) / nz as f64;
    let mut mesh = VolumeMesh::new();
    for k in 0..=nz {
        let z = min[2] + dz * k as f64;
        for j in 0..=ny {
            let y = min[1] + dy * j as f64;
            for i in 0..=nx {
                let x = min[0] + dx * i as f64;
                mesh.add_node([x, y, z]);
            }
        }
    }

    let mut cells = Vec::with_capacity(nx * ny * nz);
    let row_stride = nx + 1;
    let slab_stride = row_stride * (ny + 1);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let v0 = k * slab_stride + j * row_stride + i;
                let v1 = v0 + 1;
                let v3 = v0 + row_stride;
                let v2 = v3 + 1;
                let v4 = v0 + slab_stride;
                let v5 = v4 + 1;
                let v7 = v4 + row_stride;
                let v6 = v7 + 1;
                cells.push([v0, v1, v2, v3, v4, v5, v6, v7]);
            }
        }
    }
    Ok((mesh, cells))
}

/// Generate a structured hexahedral mesh over `[min, max]` with `nx`×`ny`×`nz` cells.
pub fn hex_mesh(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
    options: MeshGenerationOptions,
) -> Result<VolumeMesh, MeshError> {
    let (mut mesh, cells) = block_lattice(nx, ny, nz, min, max)?;
    for c in cells {
        mesh.add_element(CellType::Hexahedron, c.to_vec(), options.part)?;
    }
    mesh.rebuild();
    Ok(mesh)
}

/// Structured prism mesh: every lattice hex is cut into two prisms along the
/// `v0–v2` diagonal of its horizontal faces.
pub fn prism_mesh(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
    options: MeshGenerationOptions,
) -> Result<VolumeMesh, MeshError> {
    let (mut mesh, cells) = block_lattice(nx, ny, nz, min, max)?;
    for c in cells {
        for p in [[0, 1, 2, 4, 5, 6], [0, 2, 3, 4, 6, 7]] {
            let nodes: Vec<usize> = p.iter().map(|&k| c[k]).collect();
            mesh.add_element(CellType::Prism, nodes, options.part)?;
        }
    }
    mesh.rebuild();
    Ok(mesh)
}

/// Structured tetrahedral mesh: every lattice hex is cut into six tets around
/// its `v0–v6` diagonal. Face diagonals match between neighboring hexes.
pub fn tet_mesh(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
    options: MeshGenerationOptions,
) -> Result<VolumeMesh, MeshError> {
    const SIX_TETS: [[usize; 4]; 6] = [
        [0, 1, 2, 6],
        [0, 2, 3, 6],
        [0, 3, 7, 6],
        [0, 7, 4, 6],
        [0, 4, 5, 6],
        [0, 5, 1, 6],
    ];
    let (mut mesh, cells) = block_lattice(nx, ny, nz, min, max)?;
    for c in cells {
        for t in SIX_TETS {
            let nodes: Vec<usize> = t.iter().map(|&k| c[k]).collect();
            mesh.add_element(CellType::Tetrahedron, nodes, options.part)?;
        }
    }
    mesh.rebuild();
    Ok(mesh)
}
