use voxelgen::{
    BlockType, ChunkCoord, ChunkStatus, ChunkStore, WorldExtent, WorldGrid, WorldSettings,
};

fn flat_world() -> WorldGrid {
    let mut settings = WorldSettings::flat(4, 2, 1);
    settings.world_size = WorldExtent { x: 2, y: 1, z: 2 };
    WorldGrid::new(settings, None).unwrap()
}

#[test]
fn flat_world_meshes_only_the_surface() {
    let mut world = flat_world();
    world.generate().unwrap();
    assert_eq!(world.mesh(), 4);

    let stats = world.stats();
    assert_eq!(stats.chunks, 4);
    assert_eq!(stats.solid_quads, 64);
    assert_eq!(stats.fluid_quads, 0);

    for chunk in world.chunks() {
        assert_eq!(chunk.status(), ChunkStatus::Created);
        let mesh = chunk.mesh().unwrap();
        assert!(mesh.fluid.is_empty());
        for vertex in &mesh.solid.vertices {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
            assert_eq!(vertex.position[1], 3.0);
        }
        assert_eq!(chunk.block(0, 2, 0).map(|b| b.kind), Some(BlockType::Grass));
        assert_eq!(chunk.block(0, 0, 0).map(|b| b.kind), Some(BlockType::Bedrock));
    }

    assert_eq!(world.mesh(), 0);
}

#[test]
fn invalidation_triggers_remesh_of_neighbors() {
    let mut world = flat_world();
    world.generate().unwrap();
    world.mesh();

    world.invalidate_neighbors(ChunkCoord::new(0, 0, 0));
    // Self plus the two in-range face neighbours; the diagonal chunk is untouched
    assert_eq!(world.mesh(), 3);
    assert_eq!(world.stats().solid_quads, 64);
}

#[test]
fn same_seed_same_world() {
    let settings = || {
        let mut settings = WorldSettings::default();
        settings.chunk_size = 8;
        settings.world_size = WorldExtent { x: 2, y: 2, z: 2 };
        settings.terrain.water_level = 6;
        settings.terrain.surface.base = -40;
        settings.terrain.stone.base = -60;
        settings
    };

    let mut first = WorldGrid::new(settings(), None).unwrap();
    let mut second = WorldGrid::new(settings(), None).unwrap();
    first.generate().unwrap();
    second.generate().unwrap();
    first.mesh();
    second.mesh();

    for chunk in first.chunks() {
        let other = second.chunk_at(chunk.coord()).unwrap();
        assert_eq!(chunk.grid(), other.grid());
        assert_eq!(chunk.mesh(), other.mesh());
    }
    assert_eq!(first.stats(), second.stats());

    // Nothing is drawn on the outer shell of the world
    for chunk in first.chunks() {
        let mesh = chunk.mesh().unwrap();
        for vertex in mesh.solid.vertices.iter().chain(&mesh.fluid.vertices) {
            let [x, y, z] = vertex.position;
            let [nx, ny, nz] = vertex.normal;
            assert!(!(x == 0.0 && nx < 0.0) && !(x == 16.0 && nx > 0.0));
            assert!(!(y == 0.0 && ny < 0.0) && !(y == 16.0 && ny > 0.0));
            assert!(!(z == 0.0 && nz < 0.0) && !(z == 16.0 && nz > 0.0));
        }
    }
}

#[test]
fn saved_chunks_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let settings = {
        let mut settings = WorldSettings::flat(4, 2, 1);
        settings.world_size = WorldExtent { x: 2, y: 1, z: 2 };
        settings
    };

    let mut world = WorldGrid::new(settings.clone(), Some(ChunkStore::new(dir.path()))).unwrap();
    world.generate().unwrap();
    world.mesh();
    assert_eq!(world.save_all().unwrap(), 4);

    let mut restored = WorldGrid::new(settings, Some(ChunkStore::new(dir.path()))).unwrap();
    restored.generate().unwrap();
    restored.mesh();
    assert_eq!(restored.stats().restored, 4);
    assert_eq!(restored.stats().solid_quads, 64);
}
