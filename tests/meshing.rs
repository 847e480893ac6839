use cgmath::Point3;
use voxel_world::{
    engine_state::rendering::{
        meshing::{voxel_offset, VERTICES_PER_CUBE},
        vertex::{Position, TexCoord},
    },
    BlockInstance, Chunk, GeneratorKind, Mesher,
};

fn front_face(offset: [f32; 3]) -> Vec<Position> {
    [
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, -1.0],
    ]
    .into_iter()
    .map(|[x, y, z]| Position::new(x + offset[0], y + offset[1], z + offset[2]))
    .collect()
}

fn top_face(offset: [f32; 3]) -> Vec<Position> {
    [
        [-1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
    ]
    .into_iter()
    .map(|[x, y, z]| Position::new(x + offset[0], y + offset[1], z + offset[2]))
    .collect()
}

#[test]
fn fully_solid_chunk_has_n_cubed_times_36_vertices() {
    let generator = GeneratorKind::Uniform {
        block: "core:solid".to_owned(),
    }
    .build(&BlockInstance::air());
    for n in [1, 3, 8] {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), n);
        chunk.populate(generator.as_ref(), 0).unwrap();
        let mesh = chunk.build_mesh().unwrap();
        let expected = (n as usize).pow(3) * 36;
        assert_eq!(mesh.vertex_count(), expected);
        assert_eq!(mesh.uvs().len(), expected);
    }
}

#[test]
fn golden_cube_at_origin() {
    let grid = vec![BlockInstance::solid(); 27];
    let mesh = Mesher::build(&grid, 3).unwrap();
    let cube = mesh.cube_positions(0).unwrap();

    assert_eq!(&cube[0..6], front_face([0.0; 3]).as_slice());
    assert_eq!(&cube[30..36], top_face([0.0; 3]).as_slice());
    assert_eq!(
        &mesh.cube_uvs(0).unwrap()[0..6],
        &[
            TexCoord::new(0.0, 0.0),
            TexCoord::new(1.0, 0.0),
            TexCoord::new(1.0, 1.0),
            TexCoord::new(1.0, 1.0),
            TexCoord::new(0.0, 1.0),
            TexCoord::new(0.0, 0.0),
        ]
    );
}

#[test]
fn golden_cube_at_1_2_3() {
    let n = 4;
    let grid = vec![BlockInstance::air(); 64];
    let mesh = Mesher::build(&grid, n).unwrap();

    let offset = voxel_offset(1, 2, 3, n as usize);
    assert_eq!(offset, 1 * 36 + 4 * (2 * 36 + 4 * (3 * 36)));
    let cube = mesh.cube_positions(offset).unwrap();
    assert_eq!(cube.len(), VERTICES_PER_CUBE);

    assert_eq!(&cube[0..6], front_face([2.0, 4.0, 6.0]).as_slice());
    assert_eq!(&cube[30..36], top_face([2.0, 4.0, 6.0]).as_slice());
}

#[test]
fn mesh_is_rebuilt_after_an_edit() {
    let generator = GeneratorKind::Flat {
        ground_height: 1,
        block: "core:grass".to_owned(),
    }
    .build(&BlockInstance::air());
    let mut chunk = Chunk::new(Point3::new(0, 0, 0), 2);
    chunk.populate(generator.as_ref(), 0).unwrap();

    let before = chunk.build_mesh().unwrap().clone();
    chunk.place_block(Point3::new(1, 1, 1), BlockInstance::solid()).unwrap();
    assert!(chunk.is_dirty());

    // Geometry does not depend on block type, so the rebuilt mesh is identical.
    let after = chunk.build_mesh().unwrap();
    assert_eq!(after, &before);
    assert!(!chunk.is_dirty());
}
