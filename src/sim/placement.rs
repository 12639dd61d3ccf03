//! Dot placement by rejection sampling
//!
//! Candidates are drawn uniformly inside the arena and redrawn while they sit
//! too close to another dot or inside the player's spawn zone. A dot that
//! can't be placed within the attempt budget is skipped for the stage.

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::state::Arena;
use crate::consts::MAX_PLACEMENT_ATTEMPTS;

/// Place up to `count` square entities of edge `size`.
///
/// `reserved` holds positions already occupied (dots that survive into the
/// batch); each new position keeps at least `min_distance` from those and
/// from every position placed earlier in the batch. When `exclusion` is set,
/// no placed rectangle overlaps it.
pub fn place_enemies(
    rng: &mut impl Rng,
    arena: &Arena,
    size: f32,
    count: u32,
    min_distance: f32,
    exclusion: Option<Rect>,
    reserved: &[Vec2],
) -> Vec<Vec2> {
    let max = arena.max_position(Vec2::splat(size));
    let mut occupied: Vec<Vec2> = reserved.to_vec();
    let mut placed = Vec::with_capacity(count as usize);

    for index in 0..count {
        let found = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let candidate = Vec2::new(
                rng.random_range(0.0..=max.x),
                rng.random_range(0.0..=max.y),
            );
            is_valid(candidate, size, min_distance, exclusion, &occupied).then_some(candidate)
        });

        match found {
            Some(pos) => {
                occupied.push(pos);
                placed.push(pos);
            }
            None => log::warn!(
                "No room for dot {} after {} attempts, skipping it this stage",
                index,
                MAX_PLACEMENT_ATTEMPTS
            ),
        }
    }

    placed
}

/// Check spacing against occupied positions and the exclusion zone
fn is_valid(
    candidate: Vec2,
    size: f32,
    min_distance: f32,
    exclusion: Option<Rect>,
    occupied: &[Vec2],
) -> bool {
    if let Some(zone) = exclusion {
        if Rect::at(candidate, Vec2::splat(size)).overlaps(&zone) {
            return false;
        }
    }
    occupied
        .iter()
        .all(|other| candidate.distance(*other) >= min_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pairwise_ok(points: &[Vec2], min_distance: f32) -> bool {
        points.iter().enumerate().all(|(i, a)| {
            points[i + 1..]
                .iter()
                .all(|b| a.distance(*b) >= min_distance)
        })
    }

    #[test]
    fn test_five_dots_in_600_arena() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let arena = Arena::new(600.0, 600.0);
        let placed = place_enemies(&mut rng, &arena, 20.0, 5, 30.0, None, &[]);

        assert_eq!(placed.len(), 5);
        assert!(pairwise_ok(&placed, 30.0));
        for pos in &placed {
            assert!(arena.contains(*pos, Vec2::splat(20.0)));
        }
    }

    #[test]
    fn test_respects_reserved_points() {
        let mut rng = Pcg32::seed_from_u64(9);
        let arena = Arena::new(200.0, 200.0);
        let reserved = [Vec2::new(50.0, 50.0), Vec2::new(150.0, 150.0)];
        let placed = place_enemies(&mut rng, &arena, 20.0, 4, 40.0, None, &reserved);

        for pos in &placed {
            for r in &reserved {
                assert!(pos.distance(*r) >= 40.0);
            }
        }
    }

    #[test]
    fn test_avoids_exclusion_zone() {
        let mut rng = Pcg32::seed_from_u64(77);
        let arena = Arena::new(600.0, 600.0);
        let zone = Rect::new(247.0, 230.0, 106.0, 140.0);
        let placed = place_enemies(&mut rng, &arena, 20.0, 8, 30.0, Some(zone), &[]);

        assert_eq!(placed.len(), 8);
        for pos in &placed {
            assert!(!Rect::at(*pos, Vec2::splat(20.0)).overlaps(&zone));
        }
    }

    #[test]
    fn test_exhaustion_skips_instead_of_failing() {
        // A 20x20 arena only fits one dot when they must be 100 apart
        let mut rng = Pcg32::seed_from_u64(1);
        let arena = Arena::new(20.0, 20.0);
        let placed = place_enemies(&mut rng, &arena, 20.0, 3, 100.0, None, &[]);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0], Vec2::ZERO);
    }

    #[test]
    fn test_fully_excluded_arena_places_nothing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let arena = Arena::new(100.0, 100.0);
        let placed = place_enemies(&mut rng, &arena, 10.0, 3, 0.0, Some(arena.bounds()), &[]);
        assert!(placed.is_empty());
    }

    proptest! {
        #[test]
        fn placements_keep_spacing_and_bounds(
            seed in any::<u64>(),
            count in 0u32..12,
            min_distance in 0.0f32..60.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let arena = Arena::new(600.0, 600.0);
            let placed = place_enemies(&mut rng, &arena, 20.0, count, min_distance, None, &[]);

            prop_assert!(placed.len() <= count as usize);
            prop_assert!(pairwise_ok(&placed, min_distance));
            for pos in &placed {
                prop_assert!(arena.contains(*pos, Vec2::splat(20.0)));
            }
        }
    }
}
