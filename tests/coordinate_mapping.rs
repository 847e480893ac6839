use cgmath::Point3;
use proptest::prelude::*;
use voxel_world::{ChunkLocation, CoordinateMapper};

proptest! {
    #[test]
    fn map_axis_recomposes_the_world_coordinate(w in any::<i32>(), n in 1u32..=256) {
        let mapper = CoordinateMapper::new(n).unwrap();
        let (chunk, local) = mapper.map_axis(w);
        prop_assert!(local < n as usize);
        prop_assert_eq!(chunk as i64 * n as i64 + local as i64, w as i64);
    }

    #[test]
    fn locate_round_trips(
        x in -100_000i32..100_000,
        y in -100_000i32..100_000,
        z in -100_000i32..100_000,
        n in 1u32..=64,
    ) {
        let mapper = CoordinateMapper::new(n).unwrap();
        let world = Point3::new(x, y, z);
        let location = mapper.locate(world);
        prop_assert_eq!(mapper.to_world(location), world);

        let origin = mapper.chunk_origin(location.chunk);
        prop_assert_eq!(origin.x.rem_euclid(n as i32), 0);
        prop_assert_eq!(origin.y.rem_euclid(n as i32), 0);
        prop_assert_eq!(origin.z.rem_euclid(n as i32), 0);
    }

    #[test]
    fn continuous_positions_land_in_the_floored_voxel(
        x in -10_000.0f32..10_000.0,
        y in -10_000.0f32..10_000.0,
        z in -10_000.0f32..10_000.0,
    ) {
        let voxel = CoordinateMapper::voxel_at(Point3::new(x, y, z)).unwrap();
        prop_assert!(voxel.x as f32 <= x && x < voxel.x as f32 + 1.0);
        prop_assert!(voxel.y as f32 <= y && y < voxel.y as f32 + 1.0);
        prop_assert!(voxel.z as f32 <= z && z < voxel.z as f32 + 1.0);
    }
}

#[test]
fn documented_examples_for_chunk_size_16() {
    let mapper = CoordinateMapper::new(16).unwrap();
    let cases = [
        (-1, (-1, 15)),
        (0, (0, 0)),
        (15, (0, 15)),
        (16, (1, 0)),
        (-16, (-1, 0)),
        (-17, (-2, 15)),
    ];
    for (world, expected) in cases {
        assert_eq!(mapper.map_axis(world), expected, "world = {world}");
    }
}

#[test]
fn negative_corner_maps_to_the_far_end_of_the_previous_chunk() {
    let mapper = CoordinateMapper::new(16).unwrap();
    assert_eq!(
        mapper.locate(Point3::new(-1, -16, -17)),
        ChunkLocation {
            chunk: Point3::new(-1, -1, -2),
            local: Point3::new(15, 0, 15),
        }
    );
}

#[test]
fn render_space_camera_maps_to_world_voxels() {
    // Cube v spans [2v - 1, 2v + 1] in render space.
    let voxel = CoordinateMapper::render_to_world(Point3::new(-0.5, 1.2, 31.0)).unwrap();
    assert_eq!(voxel, Point3::new(0, 1, 16));
    assert!(CoordinateMapper::render_to_world(Point3::new(f32::NEG_INFINITY, 0.0, 0.0)).is_err());
}
