//! Pass value of a directed player-to-player edge
//!
//! `cost = skill_average * pass_quality / distance`
//!
//! Higher is better: the resolver picks the maximum, so this is a
//! preference score rather than a shortest-path weight.
//!
//! `pass_quality` samples the possessing side's strength a short way along
//! the pass line from each end. That approximates the contested space around
//! passer and receiver instead of the exact spots they stand on.

use super::coordinates::Coordinate;
use super::player::PhasePlayer;
use super::tactics::{TacticalAttributes, TeamSide};

/// Distances at or below this are treated as this value
pub const DISTANCE_EPSILON: f64 = 1e-3;

/// How far along the pass line the send/receive samples are taken
pub const SAMPLE_OFFSET: f64 = 0.1;

/// Factors behind one edge cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCost {
    pub distance: f64,
    pub send_point: Coordinate,
    pub receive_point: Coordinate,
    pub pass_quality: f64,
    pub skill_average: f64,
    pub cost: f64,
}

/// Points near the passer and near the receiver, pulled toward each other.
///
/// Returns `(send, receive)`.
pub fn sample_points(from: &Coordinate, to: &Coordinate) -> (Coordinate, Coordinate) {
    let theta = from.bearing_to(to);
    let dx = (SAMPLE_OFFSET * theta.sin()).abs();
    let dy = (SAMPLE_OFFSET * theta.cos()).abs();

    let (send_x, receive_x) =
        if from.x > to.x { (from.x - dx, to.x + dx) } else { (from.x + dx, to.x - dx) };
    let (send_y, receive_y) =
        if from.y > to.y { (from.y - dy, to.y + dy) } else { (from.y + dy, to.y - dy) };

    (Coordinate::new(send_x, send_y), Coordinate::new(receive_x, receive_y))
}

/// Full breakdown of the pass value from `from` to `to` for `side`
pub fn evaluate_edge<A: TacticalAttributes + ?Sized>(
    from: &PhasePlayer,
    to: &PhasePlayer,
    attributes: &A,
    side: TeamSide,
) -> EdgeCost {
    let distance = from.location.distance(&to.location).max(DISTANCE_EPSILON);

    let (send_point, receive_point) = sample_points(&from.location, &to.location);
    let pass_quality = (attributes.team_strength(side, &receive_point)
        + attributes.team_strength(side, &send_point))
        / 2.0;

    let skill_average = (from.rating + to.rating) / 2.0;

    EdgeCost {
        distance,
        send_point,
        receive_point,
        pass_quality,
        skill_average,
        cost: (skill_average * pass_quality) / distance,
    }
}

#[inline]
pub fn edge_cost<A: TacticalAttributes + ?Sized>(
    from: &PhasePlayer,
    to: &PhasePlayer,
    attributes: &A,
    side: TeamSide,
) -> f64 {
    evaluate_edge(from, to, attributes, side).cost
}
