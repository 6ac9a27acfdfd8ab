use crate::core::{Branch, Game, GameBuilder, TopologyError};
use crate::model::{
    Condition, Conversion, CostRequirement, Formula, Generator, GeneratorId, LayerId,
    PurchaseMode, ResetRule, Resource, ResourceId, Upgrade, UpgradeId,
};
use crate::num::Decimal;

/// Starting (and reset) amount of vertices.
pub const STARTING_POINTS: i32 = 10;

/// Ids of the objects the shell and tests address directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentIds {
    pub main: LayerId,
    pub vertices: LayerId,
    pub lines: LayerId,
    pub irregular: LayerId,
    pub alpha: LayerId,
    pub points: ResourceId,
    pub line_points: ResourceId,
    pub irregular_points: ResourceId,
    pub alpha_points: ResourceId,
    pub alpha_power: ResourceId,
    /// Vertex upgrades 11 through 14, in order.
    pub vertex_upgrades: [UpgradeId; 4],
    /// Vertex repeatable 21.
    pub vertex_repeatable: GeneratorId,
    /// Generators α1 and α2.
    pub alpha_generators: [GeneratorId; 2],
}

/// Builds the shape game: a point-producing main layer and the vertex,
/// line, irregular-quadrilateral and alpha layers around it.
pub fn build_game() -> Result<(Game, ContentIds), TopologyError> {
    let mut builder = GameBuilder::new();

    let main = builder.layer("main", "Tree");
    let vertices = builder.layer("v", "Vertices");
    let lines = builder.layer("l", "Lines");
    let irregular = builder.layer("iq", "Irregular Quadrilaterals");
    let alpha = builder.layer("a", "Alpha");

    let points = builder.resource(
        main,
        Resource::new("main.points", "vertices", STARTING_POINTS)
            .with_best()
            .with_total(),
    );

    let upgrade_specs = [
        ("v.11", 10, "Start generating vertices"),
        ("v.12", 10, "Double vertex generation"),
        ("v.13", 20, "Vertex generation is multiplied by 1+(vertex upgrades/3)"),
        ("v.14", 40, "Multiply vertex generation by log10(vertices+1)+1"),
    ];
    let mut vertex_upgrades = Vec::with_capacity(upgrade_specs.len());
    for (key, cost, description) in upgrade_specs {
        let mut upgrade = Upgrade::new(key, description, CostRequirement::new(points, cost));
        if let Some(previous) = vertex_upgrades.last() {
            upgrade = upgrade.visible_when(Condition::UpgradeBought(*previous));
        }
        vertex_upgrades.push(builder.upgrade(vertices, upgrade));
    }
    let [u11, u12, u13, u14] = [
        vertex_upgrades[0],
        vertex_upgrades[1],
        vertex_upgrades[2],
        vertex_upgrades[3],
    ];

    let vertex_repeatable = builder.generator(
        vertices,
        Generator::new(
            "v.21",
            "Vertex repeatable",
            CostRequirement::new(points, Formula::variable().mul(25).add(50)),
        )
        .with_description("Multiply vertex generation by 1.5 per upgrade")
        .with_effect(Formula::variable().pow_base(1.5))
        .visible_when(Condition::UpgradeBought(u14)),
    );
    builder.reset_rule(vertices, ResetRule::whole_layer(vertices));

    let point_gain = Formula::constant(1)
        .mul(Formula::constant(2).when_bought(u12))
        .mul(Formula::upgrades_bought(vertices).div(3).add(1).when_bought(u13))
        .mul(Formula::resource(points).add(1).log10().add(1).when_bought(u14))
        .mul(Formula::owned(vertex_repeatable).pow_base(1.5));
    builder.production(
        main,
        points,
        Formula::select(Condition::UpgradeBought(u11), point_gain, 0),
    );

    let line_points = builder.resource(lines, Resource::new("l.points", "lines", 0));
    builder.conversion(
        lines,
        Conversion::cumulative(points, line_points, Formula::variable().log10().div(6).sub(1)),
    );

    let irregular_points = builder.resource(
        irregular,
        Resource::new("iq.points", "irregular quadrilaterals", 0),
    );
    builder.conversion(
        irregular,
        Conversion::cumulative(points, irregular_points, Formula::variable().log10().sub(2)),
    );

    let alpha_points = builder.resource(alpha, Resource::new("a.points", "alpha", 0));
    let alpha_power = builder.resource(
        alpha,
        Resource::new("a.power", "α power", 0).with_best(),
    );
    builder.conversion(
        alpha,
        Conversion::cumulative(points, alpha_points, Formula::variable().div(5).sqrt()),
    );
    let alpha_one = builder.generator(
        alpha,
        Generator::new(
            "a.gen.1",
            "Generator α1",
            CostRequirement::new(alpha_points, Formula::variable().div(5).floor().pow_base(3)),
        )
        .with_description("Generates 1 α power per second")
        .with_purchase_mode(PurchaseMode::Max)
        .producing(alpha_power),
    );
    let alpha_two = builder.generator(
        alpha,
        Generator::new(
            "a.gen.2",
            "Generator α2",
            CostRequirement::new(alpha_power, Formula::variable().add(1).pow_base(10)),
        )
        .with_description("Generates 0.1 bonus α1 per second")
        .with_effect(Formula::variable().div(10))
        .visible_when(Condition::GeneratorOwned {
            generator: alpha_one,
            at_least: Decimal::from(5),
        })
        .feeding(alpha_one),
    );

    let on_reset = ResetRule::resources([points]);
    let game = builder.build(
        vec![vec![vertices], vec![lines, irregular, alpha]],
        &[
            Branch::new(lines, vertices),
            Branch::new(irregular, vertices),
            Branch::new(alpha, vertices),
        ],
        on_reset,
    )?;

    Ok((
        game,
        ContentIds {
            main,
            vertices,
            lines,
            irregular,
            alpha,
            points,
            line_points,
            irregular_points,
            alpha_points,
            alpha_power,
            vertex_upgrades: [u11, u12, u13, u14],
            vertex_repeatable,
            alpha_generators: [alpha_one, alpha_two],
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::{STARTING_POINTS, build_game};
    use crate::model::StateView;
    use crate::num::Decimal;

    #[test]
    fn content_builds_with_acyclic_visibility() {
        let (game, ids) = build_game().expect("content should build");

        assert!(game.visibility_is_acyclic());
        assert_eq!(game.layer_id("iq"), Some(ids.irregular));
        assert_eq!(game.tree().descendants(ids.alpha), vec![ids.vertices]);
        assert_eq!(
            game.resource_value(ids.points),
            Some(Decimal::from(STARTING_POINTS))
        );
    }

    #[test]
    fn points_only_flow_after_the_first_upgrade() {
        let (mut game, ids) = build_game().expect("content should build");
        let [u11, u12, ..] = ids.vertex_upgrades;

        game.tick(1.0);
        assert_eq!(game.resource_value(ids.points), Some(Decimal::from(10)));

        game.purchase_upgrade(u11).expect("first upgrade");
        assert_eq!(game.resource_value(ids.points), Some(Decimal::ZERO));
        game.tick(10.0);
        assert_eq!(game.resource_value(ids.points), Some(Decimal::from(10)));

        game.purchase_upgrade(u12).expect("second upgrade");
        game.tick(5.0);
        assert_eq!(game.resource_value(ids.points), Some(Decimal::from(10)));
        assert_eq!(game.production_rate(ids.points), Ok(Decimal::from(2)));
    }

    #[test]
    fn upgrades_unlock_in_sequence() {
        let (game, ids) = build_game().expect("content should build");
        let [u11, u12, _, u14] = ids.vertex_upgrades;

        assert!(game.is_upgrade_visible(u11));
        assert!(!game.is_upgrade_visible(u12));
        assert!(!game.is_upgrade_visible(u14));
        assert!(!game.is_generator_visible(ids.vertex_repeatable));
    }
}
