mod common;

use ai_mindmap::model::{PreferencesUpdate, StorageData, ThemeColor};
use ai_mindmap::storage::{FileStore, KeyValueStore, MemoryStore};
use ai_mindmap::store::{deserialize, serialize, MindMapStore, STORAGE_KEY};
use common::{fixed_time, node, sample_map};
use insta::assert_snapshot;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_round_trip_through_blob() {
    let mut store = MindMapStore::in_memory();
    let created = store.create_mind_map(Some("X"));

    let blob = serialize(store.data()).unwrap();
    let reloaded = MindMapStore::load(Box::new(MemoryStore::with_entry(STORAGE_KEY, &blob)), STORAGE_KEY);

    let current = reloaded.current_mind_map().unwrap();
    assert_eq!(current.title, "X");
    assert_eq!(current.nodes.iter().filter(|n| n.is_root()).count(), 1);
    assert_eq!(current.created_at, created.created_at);
    assert_eq!(current.updated_at, created.updated_at);
    assert_eq!(current.nodes[0].created_at, created.nodes[0].created_at);
}

#[test]
fn test_file_store_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    let map_id = {
        let mut store = MindMapStore::load(Box::new(FileStore::new(temp_dir.path())), STORAGE_KEY);
        let map = store.create_mind_map(Some("Persistent"));
        let root = map.nodes[0].id.clone();
        store.update_current_mind_map(|mut m| {
            m.nodes.push(node("child", Some(root.as_str())));
            m
        });
        map.id
    };

    let store = MindMapStore::load(Box::new(FileStore::new(temp_dir.path())), STORAGE_KEY);
    let current = store.current_mind_map().unwrap();
    assert_eq!(current.id, map_id);
    assert_eq!(current.nodes.len(), 2);
    assert!(temp_dir.path().join("aimindmap_data.json").exists());
}

#[test]
fn test_corrupt_file_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("aimindmap_data.json"), "{\"version\": 1").unwrap();

    let store = MindMapStore::load(Box::new(FileStore::new(temp_dir.path())), STORAGE_KEY);
    assert!(store.mind_maps().is_empty());
    assert!(store.current_mind_map().is_none());
}

#[test]
fn test_preferences_are_merged() {
    let mut store = MindMapStore::in_memory();
    store.update_preferences(PreferencesUpdate {
        default_theme: Some(ThemeColor::Mint),
        ..Default::default()
    });

    assert_eq!(store.preferences().default_theme, ThemeColor::Mint);
    assert!(store.preferences().auto_save);

    let raw = store.backend().get(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(deserialize(&raw).unwrap().preferences.default_theme, ThemeColor::Mint);
}

#[test]
fn test_persisted_json_shape() {
    let mut map = sample_map();
    map.nodes.truncate(2);
    map.nodes[1].is_ai_generated = true;
    map.nodes[1].color = ThemeColor::Lavender;

    let data = StorageData {
        current_map_id: map.id.clone(),
        mindmaps: vec![map],
        ..StorageData::default()
    };
    let pretty = serde_json::to_string_pretty(&data).unwrap();

    assert_snapshot!(pretty, @r#"
    {
      "version": "1.0",
      "mindmaps": [
        {
          "id": "map-1",
          "title": "Sample",
          "nodes": [
            {
              "id": "root",
              "content": "ROOT",
              "parentId": null,
              "color": "ocean",
              "position": {
                "x": 0.0,
                "y": 0.0
              },
              "createdAt": "2024-05-01T09:30:00.123Z",
              "updatedAt": "2024-05-01T09:30:00.123Z"
            },
            {
              "id": "c0",
              "content": "C0",
              "parentId": "root",
              "color": "lavender",
              "position": {
                "x": 0.0,
                "y": 0.0
              },
              "createdAt": "2024-05-01T09:30:00.123Z",
              "updatedAt": "2024-05-01T09:30:00.123Z",
              "isAiGenerated": true
            }
          ],
          "theme": "ocean",
          "createdAt": "2024-05-01T09:30:00.123Z",
          "updatedAt": "2024-05-01T09:30:00.123Z"
        }
      ],
      "currentMapId": "map-1",
      "preferences": {
        "defaultTheme": "ocean",
        "autoSave": true
      }
    }
    "#);
}

#[test]
fn test_timestamps_parse_with_offsets() {
    let raw = r#"{"version":"1.0","mindmaps":[{"id":"m","title":"T","nodes":[],"theme":"mist","createdAt":"2024-05-01T18:30:00.123+09:00","updatedAt":"2024-05-01T09:30:00.123Z"}],"currentMapId":"m","preferences":{"defaultTheme":"ocean","autoSave":false}}"#;

    let data = deserialize(raw).unwrap();
    assert_eq!(data.mindmaps[0].created_at, fixed_time());
    assert_eq!(data.mindmaps[0].updated_at, fixed_time());
    assert!(!data.preferences.auto_save);
}
