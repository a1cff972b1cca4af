//! End-to-end checks through the public API.

use glam::{Mat4, Vec3};
use verdant::grass::{
    BrushMode, CameraId, ChunkKey, ChunkedPointIndex, FlatGround, GrassConfig, GrassField, ViewSet,
};
use verdant::math::Frustum;
use verdant::storage::disk_io;

fn top_down_camera(center: Vec3, half_width: f32) -> Frustum {
    let proj = Mat4::orthographic_rh(-half_width, half_width, -half_width, half_width, 0.1, 200.0);
    let eye = center + Vec3::new(0.0, 50.0, 0.0);
    let view = Mat4::look_at_rh(eye, center, Vec3::NEG_Z);
    Frustum::from_view_projection(&(proj * view))
}

fn config(chunk: f32) -> GrassConfig {
    GrassConfig {
        chunk_size: [chunk; 3],
        chunk_padding: [0.0, 1.0, 0.0],
        ..Default::default()
    }
}

#[test]
fn test_paint_erase_persist_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meadow.vgf");
    let ground = FlatGround(0.0);

    let mut field = GrassField::new(config(4.0));
    for i in 0..6 {
        field.stroke(Vec3::new(i as f32 * 1.5, 0.0, 0.0), &ground);
    }
    let painted = field.index().point_count();
    assert!(painted > 20);

    field.brush_mut().mode = BrushMode::Erase;
    let erased = field.stroke(Vec3::new(3.0, 0.0, 0.0), &ground);
    assert!(erased.removed > 0);
    assert_eq!(field.index().point_count(), painted - erased.removed);
    for p in field.index().all_points() {
        assert!(p.distance(Vec3::new(3.0, 0.0, 0.0)) >= field.brush().radius);
    }

    field.save_to_file(&path).unwrap();
    let loaded = GrassField::load_from_file(&path, config(4.0)).unwrap();
    assert_eq!(loaded.index().point_count(), field.index().point_count());
    for (key, points) in field.index().chunks() {
        assert_eq!(loaded.index().chunk(key).map(|p| p.len()), Some(points.len()));
    }
}

#[test]
fn test_visibility_through_views() {
    let mut field = GrassField::new(config(4.0));
    field.index_mut().insert_many([
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(2.0, 0.0, 1.5),
        Vec3::new(41.0, 0.0, 41.0),
    ]);
    field.index_mut().save();

    let mut views = ViewSet::new();
    views.add(CameraId(0), top_down_camera(Vec3::new(2.0, 0.0, 2.0), 3.0));
    // Editor camera is the same camera; not counted again
    views.add_current(Some((CameraId(0), top_down_camera(Vec3::new(2.0, 0.0, 2.0), 3.0))));
    assert_eq!(views.len(), 1);

    let visible = field.visible_instances(&views).map(|i| i.len());
    assert_eq!(visible, Some(2));

    views.clear();
    views.add(CameraId(1), top_down_camera(Vec3::new(-100.0, 0.0, -100.0), 3.0));
    assert!(field.visible_instances(&views).is_none());
}

#[test]
fn test_rebuild_scenario_ten_points() {
    let mut index = ChunkedPointIndex::with_chunk_size(Vec3::splat(2.0));
    for i in 0..10 {
        index.insert(Vec3::new(i as f32, (i % 3) as f32, -(i as f32) * 0.5));
    }
    index.save();
    let before = index.chunk_count();

    assert!(index.rebuild(Vec3::splat(4.0)));
    assert_eq!(index.point_count(), 10);
    assert_eq!(index.all_points().len(), 10);
    assert!(index.chunk_count() <= before);
    assert_eq!(index.flat().point_count(), 10);
}

#[test]
fn test_scenario_three_points() {
    let mut index = ChunkedPointIndex::with_chunk_size(Vec3::splat(2.0));
    index.insert_many([Vec3::ZERO, Vec3::new(0.0, 0.0, 1.5), Vec3::new(5.0, 0.0, 0.0)]);
    assert_eq!(index.chunk(ChunkKey::new(0, 0, 0)).map(<[Vec3]>::len), Some(2));
    assert_eq!(index.chunk(ChunkKey::new(2, 0, 0)).map(<[Vec3]>::len), Some(1));

    assert_eq!(index.remove_near(Vec3::ZERO, 2.0), 2);
    let keys: Vec<ChunkKey> = index.chunks().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![ChunkKey::new(2, 0, 0)]);
}

#[test]
fn test_field_file_keeps_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.vgf");

    let mut field = GrassField::new(config(3.0));
    field.index_mut().insert(Vec3::new(-0.5, 0.0, 7.0));
    field.save_to_file(&path).unwrap();

    let data = disk_io::load_field(&path).unwrap().unwrap();
    assert_eq!(data.chunk_size, [3.0, 3.0, 3.0]);
    assert_eq!(data.chunk_padding, [0.0, 1.0, 0.0]);
    assert_eq!(data.chunks.len(), 1);
    assert_eq!((data.chunks[0].x, data.chunks[0].y, data.chunks[0].z), (-1, 0, 2));
}
