//! Integration tests for the voxel mesh builder.
//!
//! Randomized grids are generated from fixed seeds so failures reproduce.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voxview_mesh::{
    build, BoundingBox, Color, DenseIndexVolume, MeshBuildConfig, MeshError, Palette,
    PaletteIndexVolume, UpAxis, VoxelArray, VoxelIndex, VoxelMeshBuilder, VoxelSource,
};

const DIMS: [u32; 3] = [12, 9, 7];

struct Model {
    grid: VoxelArray,
    volume: DenseIndexVolume,
    palette: Palette,
}

fn random_palette(rng: &mut ChaCha8Rng, len: usize) -> Palette {
    // Few distinct values so different slots collide on the same color.
    (0..len)
        .map(|_| Color::rgb(rng.gen_range(0..3) * 100, rng.gen_range(0..2) * 200, 0))
        .collect()
}

fn random_model(seed: u64) -> Model {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let palette_size = rng.gen_range(1..16);
    let palette = random_palette(&mut rng, palette_size);
    let palette_len = palette.len() as i32;

    let mut grid = VoxelArray::new([-3.0, 0.0, 2.0], 0.5).unwrap();
    let mut volume = DenseIndexVolume::filled(DIMS, -1).unwrap();
    for _ in 0..rng.gen_range(1..300) {
        let index = VoxelIndex::new(
            rng.gen_range(0..DIMS[0] as i32),
            rng.gen_range(0..DIMS[1] as i32),
            rng.gen_range(0..DIMS[2] as i32),
        );
        if grid.insert(index) {
            volume.set(index, rng.gen_range(0..palette_len)).unwrap();
        }
    }

    Model { grid, volume, palette }
}

fn position_key(p: [f32; 3]) -> [u32; 3] {
    p.map(f32::to_bits)
}

#[test]
fn test_every_voxel_exactly_once() {
    for seed in 0..32 {
        let model = random_model(seed);
        let result = build(&model.grid, &model.volume, &model.palette).unwrap();

        let mut seen: HashMap<[u32; 3], usize> = HashMap::new();
        for group in result.groups() {
            for &p in group.positions() {
                *seen.entry(position_key(p)).or_default() += 1;
            }
        }

        assert_eq!(result.voxel_count(), model.grid.voxel_count(), "seed {seed}");
        assert_eq!(seen.len(), model.grid.voxel_count(), "seed {seed}");
        assert!(seen.values().all(|&n| n == 1), "seed {seed}");
        for &index in model.grid.voxel_indices() {
            let key = position_key(model.grid.spatial_location(index));
            assert!(seen.contains_key(&key), "seed {seed}: missing {index}");
        }
    }
}

#[test]
fn test_same_color_lands_in_same_group() {
    for seed in 0..32 {
        let model = random_model(seed);
        let result = build(&model.grid, &model.volume, &model.palette).unwrap();

        let mut group_of: HashMap<[u32; 3], Color> = HashMap::new();
        for group in result.groups() {
            for &p in group.positions() {
                group_of.insert(position_key(p), group.color());
            }
        }

        for &index in model.grid.voxel_indices() {
            let slot = model.volume.palette_index(index).unwrap();
            let expected = model.palette.get(slot).unwrap();
            let key = position_key(model.grid.spatial_location(index));
            assert_eq!(group_of[&key], expected, "seed {seed}: voxel {index}");
        }

        let mut colors: Vec<u32> = result.groups().iter().map(|g| g.color().to_packed()).collect();
        let before = colors.len();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), before, "seed {seed}: duplicate group color");
    }
}

#[test]
fn test_build_is_deterministic() {
    for seed in 0..8 {
        let model = random_model(seed);
        let first = build(&model.grid, &model.volume, &model.palette).unwrap();
        let second = build(&model.grid, &model.volume, &model.palette).unwrap();
        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn test_positions_follow_grid_order_within_group() {
    let model = random_model(7);
    let result = build(&model.grid, &model.volume, &model.palette).unwrap();

    for group in result.groups() {
        let expected: Vec<[f32; 3]> = model
            .grid
            .voxel_indices()
            .iter()
            .filter(|&&i| {
                model.palette.get(model.volume.palette_index(i).unwrap()) == Some(group.color())
            })
            .map(|&i| model.grid.spatial_location(i))
            .collect();
        assert_eq!(group.positions(), expected.as_slice());
    }
}

#[test]
fn test_empty_grid() {
    let grid = VoxelArray::new([4.0, 5.0, 6.0], 1.0).unwrap();
    let volume = DenseIndexVolume::filled(DIMS, 0).unwrap();
    let palette = Palette::new(vec![Color::WHITE]);

    let result = build(&grid, &volume, &palette).unwrap();
    assert!(result.groups().is_empty());
    assert_eq!(result.bounds(), BoundingBox::degenerate_at([4.0, 5.0, 6.0]));
    assert!(result.instance_buffer().instances.is_empty());
}

#[test]
fn test_two_slots_one_color() {
    let red = Color::rgb(255, 0, 0);
    let grid = VoxelArray::from_indices(
        [0.0; 3],
        1.0,
        [VoxelIndex::new(0, 0, 0), VoxelIndex::new(1, 0, 0)],
    )
    .unwrap();
    let mut volume = HashMap::new();
    volume.insert(VoxelIndex::new(0, 0, 0), 0);
    volume.insert(VoxelIndex::new(1, 0, 0), 1);

    let result = build(&grid, &volume, &Palette::new(vec![red, red])).unwrap();
    assert_eq!(result.groups().len(), 1);
    assert_eq!(result.groups()[0].color(), red);
    assert_eq!(
        result.groups()[0].positions(),
        &[
            grid.spatial_location(VoxelIndex::new(0, 0, 0)),
            grid.spatial_location(VoxelIndex::new(1, 0, 0)),
        ]
    );
}

#[test]
fn test_bad_palette_index_aborts_without_result() {
    let mut model = random_model(3);
    let victim = *model
        .grid
        .voxel_indices()
        .last()
        .expect("random models are never empty");
    for &index in model.grid.voxel_indices() {
        model.volume.set(index, 0).unwrap();
    }
    model.volume.set(victim, 5).unwrap();
    let palette = Palette::new(vec![Color::WHITE; 3]);

    assert_eq!(
        build(&model.grid, &model.volume, &palette),
        Err(MeshError::IndexOutOfRange { voxel: victim, palette_index: 5, palette_len: 3 })
    );
}

#[test]
fn test_non_empty_grid_empty_palette() {
    let model = random_model(5);
    assert!(model.grid.voxel_count() > 0);

    assert_eq!(
        build(&model.grid, &model.volume, &Palette::default()),
        Err(MeshError::EmptyPaletteForNonEmptyGrid { voxel_count: model.grid.voxel_count() })
    );
}

#[test]
fn test_instance_buffer_tiles_groups() {
    for seed in 0..8 {
        let model = random_model(seed);
        let result = build(&model.grid, &model.volume, &model.palette).unwrap();
        let buffer = result.instance_buffer();

        assert_eq!(buffer.instances.len(), result.voxel_count());
        assert_eq!(buffer.batches.len(), result.groups().len());

        let mut next = 0;
        for (batch, group) in buffer.batches.iter().zip(result.groups()) {
            assert_eq!(batch.first_instance, next);
            assert_eq!(batch.color, group.color());
            assert_eq!(batch.instance_count as usize, group.len());
            let positions: Vec<[f32; 3]> =
                buffer.batch_instances(batch).iter().map(|i| i.position()).collect();
            assert_eq!(positions.as_slice(), group.positions());
            next += batch.instance_count;
        }
        assert_eq!(next as usize, buffer.instances.len());
    }
}

#[test]
fn test_builder_from_toml_config() {
    let config = MeshBuildConfig::from_toml_str("cube_size = 0.5\nup_axis = \"z\"").unwrap();
    let builder = VoxelMeshBuilder::new(config).unwrap();
    let model = random_model(11);

    let result = builder.build(&model.grid, &model.volume, &model.palette).unwrap();
    assert_eq!(result.up_axis(), UpAxis::Z);
    assert!(result
        .instance_buffer()
        .instances
        .iter()
        .all(|i| i.position_scale[3] == 0.5));
}

#[test]
fn test_nested_volume_from_asset_layout() {
    // [x][y][z] nested arrays, the shape asset loaders hand out.
    let nested = vec![
        vec![vec![0, 1], vec![2, 0]],
        vec![vec![1, 1], vec![0, 2]],
    ];
    let volume = DenseIndexVolume::from_nested(&nested).unwrap();
    let grid = VoxelArray::from_indices(
        [0.0; 3],
        1.0,
        [VoxelIndex::new(0, 0, 1), VoxelIndex::new(1, 0, 0), VoxelIndex::new(0, 1, 0)],
    )
    .unwrap();
    let palette = Palette::new(vec![Color::BLACK, Color::WHITE, Color::rgb(0, 0, 255)]);

    let result = build(&grid, &volume, &palette).unwrap();
    assert_eq!(result.groups().len(), 2);
    assert_eq!(result.groups()[0].color(), Color::WHITE);
    assert_eq!(result.groups()[0].len(), 2);
    assert_eq!(result.groups()[1].color(), Color::rgb(0, 0, 255));
}

#[test]
fn test_packed_palette_resolves_through_build() {
    // 0xAABBGGRR: opaque red, half-transparent green.
    let palette = Palette::from_packed(&[0xFF00_00FF, 0x8000_FF00]);
    let grid = VoxelArray::from_indices(
        [0.0; 3],
        1.0,
        [VoxelIndex::new(0, 0, 0), VoxelIndex::new(1, 0, 0), VoxelIndex::new(2, 0, 0)],
    )
    .unwrap();
    let volume = DenseIndexVolume::new([3, 1, 1], vec![0, 1, 0]).unwrap();

    let groups = build(&grid, &volume, &palette).unwrap().into_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].color(), Color::rgb(255, 0, 0));
    assert_eq!(groups[0].positions(), &[[0.5, 0.5, 0.5], [2.5, 0.5, 0.5]]);
    assert_eq!(groups[1].color(), Color::rgba(0, 255, 0, 128));
    assert_eq!(groups[1].len(), 1);
}
