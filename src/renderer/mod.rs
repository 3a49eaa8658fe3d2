//! Frame rendering over an opaque draw surface
//!
//! Draw order is fixed: background, player, bullets, enemies.

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::platform::{AssetId, Color, DrawSurface};
use crate::sim::GameState;

/// Draw one complete frame of `state`
pub fn draw_frame(surface: &mut impl DrawSurface, state: &GameState) {
    surface.clear();
    surface.draw_image(AssetId::Background, 0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);

    let p = &state.player;
    surface.draw_image(AssetId::Player, p.pos.x, p.pos.y, p.size.x, p.size.y);

    for b in &state.bullets {
        surface.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y, Color::BULLET);
    }

    for e in &state.enemies {
        let sprite = e.kind.props().sprite;
        surface.draw_image(sprite, e.pos.x, e.pos.y, e.size.x, e.size.y);
    }
}
