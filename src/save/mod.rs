mod bridge;
mod codec;
mod model;

pub use bridge::{apply_save_data, save_data_from_game};
pub use codec::{
    export_to_base64, import_from_base64, load_from_json_string, read_save_file,
    save_to_json_string, write_save_file,
};
pub use model::{SAVE_VERSION, SaveData, SaveGenerator, SaveResource};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{
        SAVE_VERSION, SaveData, SaveGenerator, SaveResource, apply_save_data, export_to_base64,
        import_from_base64, load_from_json_string, save_data_from_game, save_to_json_string,
    };
    use crate::data::build_game;
    use crate::model::{PurchaseMode, StateView};
    use crate::num::Decimal;

    fn sample_save() -> SaveData {
        SaveData {
            version: SAVE_VERSION,
            resources: BTreeMap::from([
                (
                    "main.points".to_string(),
                    SaveResource {
                        value: Decimal::from(1234.5),
                        best: Some("1e500".parse().expect("literal")),
                        total: Some(Decimal::from(99_999)),
                    },
                ),
                (
                    "a.points".to_string(),
                    SaveResource {
                        value: Decimal::from(7),
                        best: None,
                        total: None,
                    },
                ),
            ]),
            generators: BTreeMap::from([(
                "a.gen.1".to_string(),
                SaveGenerator {
                    owned: Decimal::from(12),
                    bonus: Decimal::from(0.25),
                },
            )]),
            upgrades: BTreeMap::from([("v.11".to_string(), true), ("v.12".to_string(), false)]),
            total_ticks: 42,
            play_time: 2.1,
            paused: true,
            saved_at: 1_700_000_000,
        }
    }

    #[test]
    fn save_json_round_trip() {
        let original = sample_save();
        let json = save_to_json_string(&original).expect("save JSON should serialize");
        let restored = load_from_json_string(&json).expect("save JSON should deserialize");

        assert_eq!(restored, original);
    }

    #[test]
    fn save_base64_round_trip() {
        let original = sample_save();
        let encoded = export_to_base64(&original).expect("save should export to base64");
        let restored = import_from_base64(&encoded).expect("save should import from base64");

        assert_eq!(restored, original);
    }

    #[test]
    fn newer_save_versions_are_rejected() {
        let json = format!(r#"{{ "version": {} }}"#, SAVE_VERSION + 1);

        assert!(load_from_json_string(&json).is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let save = load_from_json_string(r#"{ "total_ticks": 3 }"#).expect("sparse save parses");

        assert_eq!(save.version, SAVE_VERSION);
        assert_eq!(save.total_ticks, 3);
        assert!(save.resources.is_empty());
    }

    #[test]
    fn game_bridge_round_trip() {
        let (mut game, ids) = build_game().expect("content builds");
        game.purchase_upgrade(ids.vertex_upgrades[0])
            .expect("first vertex upgrade");
        game.tick(30.0);
        game.request_reset(ids.alpha).expect("alpha reset");
        game.purchase(ids.alpha_generators[0], PurchaseMode::Max)
            .expect("alpha generator");
        game.tick(2.0);

        let save = save_data_from_game(&game, 5);
        let (mut restored, _) = build_game().expect("content builds");
        apply_save_data(&mut restored, &save).expect("save apply should succeed");

        assert_eq!(save_data_from_game(&restored, 5), save);
        assert_eq!(
            restored.resource_value(ids.alpha_power),
            game.resource_value(ids.alpha_power)
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (mut game, ids) = build_game().expect("content builds");
        let mut save = SaveData::default();
        save.resources.insert(
            "retired.points".to_string(),
            SaveResource {
                value: Decimal::from(5),
                ..SaveResource::default()
            },
        );
        save.upgrades.insert("v.99".to_string(), true);
        save.upgrades.insert("v.11".to_string(), true);

        apply_save_data(&mut game, &save).expect("save apply should succeed");

        assert_eq!(game.upgrade_bought(ids.vertex_upgrades[0]), Some(true));
        assert_eq!(game.resource_value(ids.points), Some(Decimal::from(10)));
    }
}
