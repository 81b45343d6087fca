//! Property-based tests for viewport alignment.
//! Verifies invariants hold for ALL rectangles, not just fixed examples.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use greyplane_driver::Viewport;

proptest::proptest! {
    /// A viewport never extends past the framebuffer.
    #[test]
    fn viewport_stays_inside_framebuffer(
        x in -200i32..200,
        y in -200i32..200,
        w in -10i32..300,
        h in -10i32..300,
        bpp in proptest::sample::select(vec![1u32, 2, 4, 8, 16]),
    ) {
        if let Some(v) = Viewport::new(72, 40, 72, bpp, x, y, w, h) {
            assert!(v.width > 0 && v.height > 0);
            assert!(v.x + v.width <= 72);
            assert!(v.y + v.height <= 40);
        }
    }

    /// The left edge lands on a byte boundary for packed formats.
    #[test]
    fn left_edge_is_byte_aligned(
        x in 0i32..72,
        w in 1i32..72,
        bpp in proptest::sample::select(vec![1u32, 2, 4, 8]),
    ) {
        let v = Viewport::new(72, 40, 72, bpp, x, 0, w, 8).unwrap();
        assert_eq!((v.x * bpp) % 8, 0);
        assert_eq!(v.offset, (v.x * bpp / 8) as usize);
    }

    /// Alignment only ever grows the requested rectangle within the framebuffer.
    #[test]
    fn requested_pixels_are_covered(
        x in 0i32..72,
        y in 0i32..40,
        w in 1i32..72,
        h in 1i32..40,
        bpp in proptest::sample::select(vec![1u32, 2, 4, 8, 16]),
    ) {
        let v = Viewport::new(72, 40, 72, bpp, x, y, w, h).unwrap();
        assert!(v.x as i32 <= x);
        assert_eq!(v.y as i32, y);
        assert!((v.x + v.width) as i32 >= (x + w).min(72));
        assert_eq!((v.y + v.height) as i32, (y + h).min(40));
    }
}
