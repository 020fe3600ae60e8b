//! Possession graph
//!
//! Weighted directed acyclic graph of pass options for the team in
//! possession. Players live in an arena indexed by roster position; edges
//! live in a second arena grouped by source, so each player's outgoing
//! options are one contiguous slice.
//!
//! Edges only point strictly forward along the attacking axis. A topological
//! order is therefore the forward spatial order, and no walk over the graph
//! can revisit a player.

use std::ops::Range;
use tracing::debug;

use super::context::TacticalContext;
use super::cost::edge_cost;
use super::player::{PhasePlayer, PlayerId};
use super::tactics::{AttackDirection, TacticalAttributes, TeamSide};
use crate::error::Result;

/// Directed pass option between two roster indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub cost: f64,
}

#[derive(Debug, Clone)]
pub struct PossessionGraph {
    side: TeamSide,
    direction: AttackDirection,
    players: Vec<PhasePlayer>,
    edges: Vec<Edge>,
    outgoing: Vec<Range<usize>>,
    /// Roster indices from deepest to most advanced
    forward_order: Vec<usize>,
}

impl PossessionGraph {
    /// Build the graph for the team in possession.
    ///
    /// Fails with `InvalidRoster` if either team is empty and with
    /// `InvalidRequest` if a player id appears twice.
    pub fn build<A: TacticalAttributes>(ctx: &TacticalContext<A>) -> Result<Self> {
        ctx.validate()?;
        Ok(Self::from_roster(ctx.attacking_players(), &ctx.attributes, ctx.side, ctx.direction))
    }

    /// Build from a bare roster. An empty roster gives an empty graph.
    pub fn from_roster<A: TacticalAttributes + ?Sized>(
        players: &[PhasePlayer],
        attributes: &A,
        side: TeamSide,
        direction: AttackDirection,
    ) -> Self {
        let forwardness: Vec<f64> =
            players.iter().map(|p| direction.forwardness(&p.location)).collect();

        let mut forward_order: Vec<usize> = (0..players.len()).collect();
        forward_order.sort_by(|&a, &b| forwardness[a].total_cmp(&forwardness[b]));

        let mut rank = vec![0usize; players.len()];
        for (r, &idx) in forward_order.iter().enumerate() {
            rank[idx] = r;
        }

        let mut edges = Vec::new();
        let mut outgoing = Vec::with_capacity(players.len());

        for (from, source) in players.iter().enumerate() {
            let start = edges.len();

            for &to in &forward_order[rank[from] + 1..] {
                // equal forwardness would give a lateral edge
                if forwardness[to] > forwardness[from] {
                    edges.push(Edge {
                        from,
                        to,
                        cost: edge_cost(source, &players[to], attributes, side),
                    });
                }
            }

            outgoing.push(start..edges.len());
        }

        debug!(?side, ?direction, players = players.len(), edges = edges.len(), "possession graph built");

        Self { side, direction, players: players.to_vec(), edges, outgoing, forward_order }
    }

    pub fn side(&self) -> TeamSide {
        self.side
    }

    pub fn direction(&self) -> AttackDirection {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PhasePlayer] {
        &self.players
    }

    pub fn player(&self, index: usize) -> &PhasePlayer {
        &self.players[index]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing options of one player, most backward target first
    pub fn outgoing(&self, index: usize) -> &[Edge] {
        &self.edges[self.outgoing[index].clone()]
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        self.outgoing[index].is_empty()
    }

    pub fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn forward_order(&self) -> &[usize] {
        &self.forward_order
    }

    /// The `size` deepest players, deepest first
    pub fn back_line(&self, size: usize) -> &[usize] {
        &self.forward_order[..size.min(self.forward_order.len())]
    }

    pub fn forwardness(&self, index: usize) -> f64 {
        self.direction.forwardness(&self.players[index].location)
    }
}
