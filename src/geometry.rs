//! Vector and curve math shared by layout, routing and rendering.

use egui::{Pos2, Vec2};

/// Angle of the ray `from -> to`, in radians.
pub fn direction(from: Pos2, to: Pos2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for an angle in radians.
pub fn unit(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Normalized vector `from -> to`; zero when the points coincide.
pub fn unit_toward(from: Pos2, to: Pos2) -> Vec2 {
    let v = to - from;
    let len = v.length();
    if len <= f32::EPSILON {
        Vec2::ZERO
    } else {
        v / len
    }
}

/// Perpendicular (90° counterclockwise in screen coordinates, y-down).
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Point on the circle boundary where the ray from `center` toward `toward`
/// exits. Falls back to the top of the circle for coincident points.
pub fn circle_anchor(center: Pos2, radius: f32, toward: Pos2) -> Pos2 {
    let dir = unit_toward(center, toward);
    if dir == Vec2::ZERO {
        center + Vec2::new(0.0, -radius)
    } else {
        center + dir * radius
    }
}

/// Quadratic Bézier point at parameter `t`.
pub fn quad_point(p0: Pos2, ctrl: Pos2, p1: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let x = u * u * p0.x + 2.0 * u * t * ctrl.x + t * t * p1.x;
    let y = u * u * p0.y + 2.0 * u * t * ctrl.y + t * t * p1.y;
    Pos2::new(x, y)
}

/// Cubic Bézier point at parameter `t`.
pub fn cubic_point(p0: Pos2, c0: Pos2, c1: Pos2, p1: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    Pos2::new(
        w0 * p0.x + w1 * c0.x + w2 * c1.x + w3 * p1.x,
        w0 * p0.y + w1 * c0.y + w2 * c1.y + w3 * p1.y,
    )
}

/// The three points of a fixed-size arrowhead whose tip sits at `tip`,
/// oriented along `angle` (the path's terminal tangent).
pub fn arrowhead(tip: Pos2, angle: f32, length: f32) -> [Pos2; 3] {
    let spread = std::f32::consts::FRAC_PI_6;
    [
        tip,
        tip - unit(angle - spread) * length,
        tip - unit(angle + spread) * length,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_direction_cardinal() {
        let o = pos2(0.0, 0.0);
        assert!(direction(o, pos2(10.0, 0.0)).abs() < 1e-6);
        let down = direction(o, pos2(0.0, 10.0));
        assert!((down - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_unit_toward_zero_safe() {
        let p = pos2(3.0, 4.0);
        assert_eq!(unit_toward(p, p), Vec2::ZERO);
        let v = unit_toward(pos2(0.0, 0.0), pos2(3.0, 4.0));
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_perp_is_orthogonal() {
        let v = Vec2::new(0.6, 0.8);
        let p = perp(v);
        assert!(v.dot(p).abs() < 1e-6);
        assert!((p.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_anchor_on_boundary() {
        let c = pos2(100.0, 100.0);
        let a = circle_anchor(c, 30.0, pos2(200.0, 100.0));
        assert!((a.x - 130.0).abs() < 1e-4);
        assert!((a.y - 100.0).abs() < 1e-4);
        // Degenerate ray still lands on the circle.
        let d = circle_anchor(c, 30.0, c);
        assert!(((d - c).length() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_quad_endpoints() {
        let p0 = pos2(0.0, 0.0);
        let c = pos2(50.0, 100.0);
        let p1 = pos2(100.0, 0.0);
        assert_eq!(quad_point(p0, c, p1, 0.0), p0);
        assert_eq!(quad_point(p0, c, p1, 1.0), p1);
        let mid = quad_point(p0, c, p1, 0.5);
        assert!((mid.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_cubic_endpoints() {
        let p0 = pos2(0.0, 0.0);
        let p1 = pos2(10.0, 0.0);
        let c0 = pos2(0.0, -10.0);
        let c1 = pos2(10.0, -10.0);
        assert_eq!(cubic_point(p0, c0, c1, p1, 0.0), p0);
        assert_eq!(cubic_point(p0, c0, c1, p1, 1.0), p1);
    }

    #[test]
    fn test_arrowhead_wings_behind_tip() {
        let tip = pos2(100.0, 0.0);
        let [t, w1, w2] = arrowhead(tip, 0.0, 12.0);
        assert_eq!(t, tip);
        assert!(w1.x < tip.x && w2.x < tip.x);
        assert!((w1.y + w2.y).abs() < 1e-4, "wings symmetric about the axis");
    }
}
