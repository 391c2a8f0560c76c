use mesh_boundary_layer::DebugInvariants;
use mesh_boundary_layer::mesh_generation::{MeshGenerationOptions, hex_mesh, prism_mesh, tet_mesh};
use mesh_boundary_layer::topology::cell_type::CellType;

fn count(mesh: &mesh_boundary_layer::mesh::VolumeMesh, cell_type: CellType) -> usize {
    mesh.elements()
        .iter()
        .filter(|e| e.cell_type == cell_type)
        .count()
}

#[test]
fn hex_mesh_counts_faces_and_volume() {
    let mesh = hex_mesh(2, 3, 1, [0.0; 3], [2.0, 3.0, 1.0], MeshGenerationOptions::default())
        .expect("hex mesh");
    assert_eq!(mesh.nodes().len(), 3 * 4 * 2);
    assert_eq!(count(&mesh, CellType::Hexahedron), 6);
    // 2 * (2*3 + 2*1 + 3*1) boundary quads
    assert_eq!(mesh.faces().len(), 22);
    assert!((mesh.total_volume().unwrap() - 6.0).abs() < 1e-12);
    assert!(mesh.inverted_elements().unwrap().is_empty());
    mesh.validate_invariants().unwrap();
}

#[test]
fn prism_mesh_is_positive_and_conforming() {
    let mesh = prism_mesh(2, 2, 2, [0.0; 3], [1.0; 3], MeshGenerationOptions { part: 4 })
        .expect("prism mesh");
    assert_eq!(count(&mesh, CellType::Prism), 16);
    assert!(mesh.elements().iter().all(|e| e.part == 4));
    // each of the 8 bottom/top quads splits in two; the 16 side quads stay whole
    assert_eq!(mesh.faces().len(), 16 + 16);
    assert!((mesh.total_volume().unwrap() - 1.0).abs() < 1e-12);
    assert!(mesh.inverted_elements().unwrap().is_empty());
}

#[test]
fn tet_mesh_is_positive_and_conforming() {
    let mesh = tet_mesh(2, 2, 2, [0.0; 3], [1.0; 3], MeshGenerationOptions::default())
        .expect("tet mesh");
    assert_eq!(count(&mesh, CellType::Tetrahedron), 48);
    // 24 boundary quads, two triangles each
    assert_eq!(mesh.faces().len(), 48);
    assert!((mesh.total_volume().unwrap() - 1.0).abs() < 1e-12);
    assert!(mesh.inverted_elements().unwrap().is_empty());
}

#[test]
fn degenerate_blocks_are_rejected() {
    assert!(hex_mesh(0, 1, 1, [0.0; 3], [1.0; 3], MeshGenerationOptions::default()).is_err());
    let flat = hex_mesh(1, 1, 1, [0.0; 3], [1.0, 0.0, 1.0], MeshGenerationOptions::default());
    assert!(flat.is_err());
}
