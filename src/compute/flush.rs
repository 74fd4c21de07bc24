//! Energy flush and color kernel.
//!
//! Runs after the transition kernel has finished for every cell. Folds the
//! accumulated birth debits into the next grid, kills cells whose energy
//! overflows, and blends the display colors.

use rayon::prelude::*;

use super::codec::{MAX_ENERGY, decode, encode};
use super::color::{Rgb, fade_toward, target_color};
use super::field::FlushView;

/// Display fade rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeParams {
    pub fade_in: u8,
    pub fade_out: u8,
}

/// Apply a debit to a cell word. Energy past the cap kills the cell.
#[inline]
pub fn settle(word: u32, debit: u32) -> u32 {
    let (energy, genome) = decode(word);
    if genome == 0 {
        return 0;
    }
    let energy = energy.saturating_add(debit);
    if energy > MAX_ENERGY { 0 } else { encode(energy, genome) }
}

/// Flush one cell: settle its debit and blend its color.
#[inline]
pub fn flush_cell(word: u32, debit: u32, color: Rgb, fade: &FadeParams) -> (u32, Rgb) {
    let word = settle(word, debit);
    let color = fade_toward(color, target_color(word), fade.fade_in, fade.fade_out);
    (word, color)
}

/// Run the flush over every cell of the next grid, leaving the accumulation
/// buffer zeroed.
pub fn flush_kernel(view: FlushView<'_>, fade: &FadeParams) {
    let FlushView {
        torus,
        next,
        debits,
        colors,
    } = view;
    let width = torus.width;

    next.par_chunks_mut(width)
        .zip(debits.slots_mut().par_chunks_mut(width))
        .zip(colors.par_chunks_mut(width))
        .for_each(|((next_row, debit_row), color_row)| {
            for ((word, debit), color) in next_row
                .iter_mut()
                .zip(debit_row.iter_mut())
                .zip(color_row.iter_mut())
            {
                let owed = std::mem::take(debit.get_mut());
                (*word, *color) = flush_cell(*word, owed, *color, fade);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::codec::string_to_genome;
    use crate::compute::field::{Field, Torus};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const FADE: FadeParams = FadeParams {
        fade_in: 255,
        fade_out: 255,
    };

    #[test]
    fn test_settle() {
        let g = string_to_genome("B3/S23").unwrap();
        assert_eq!(settle(encode(10, g), 0), encode(10, g));
        assert_eq!(settle(encode(10, g), 245), encode(255, g));
        assert_eq!(settle(encode(10, g), 246), 0);
        assert_eq!(settle(0, 40), 0);
    }

    #[test]
    fn test_debit_kills_parent() {
        let g = string_to_genome("B3/S23").unwrap();
        let (word, color) = flush_cell(encode(250, g), 15, Rgb::new(9, 9, 9), &FADE);
        assert_eq!(word, 0);
        assert_eq!(color, Rgb::BLACK);
    }

    #[test]
    fn test_flush_kernel_drains_buffer() {
        let g = string_to_genome("B3/S23").unwrap();
        let torus = Torus::new(4, 3);
        let mut rng = StdRng::seed_from_u64(3);
        let mut initial = vec![0u32; torus.len()];
        initial[5] = g;
        initial[6] = g;
        let mut field = Field::new(torus, &initial, &mut rng);

        {
            let view = field.transition_view();
            view.next.copy_from_slice(view.current);
            for _ in 0..7 {
                view.debits.add(5, 3);
                view.debits.add(0, 1);
            }
        }
        flush_kernel(field.flush_view(), &FADE);
        field.swap();

        assert!(field.debits().is_clear());
        assert_eq!(field.grid()[5], encode(21, g));
        assert_eq!(field.grid()[6], g);
        assert_eq!(field.grid()[0], 0);
        assert_eq!(field.colors()[6], target_color(g));
        assert_eq!(field.colors()[0], Rgb::BLACK);
    }
}
