//! Rotation-order conversion for legacy transforms.
//!
//! Pre-versioned documents store Euler angles applied in XYZ order; the
//! versioned schema applies them in ZYX order. The conversion goes through a
//! quaternion so the composed rotation is identical.

/// Quaternion `(x, y, z, w)` from XYZ-order Euler angles in degrees.
pub fn quat_from_euler_xyz(x: f64, y: f64, z: f64) -> [f64; 4] {
    let (sx, cx) = (x.to_radians() / 2.0).sin_cos();
    let (sy, cy) = (y.to_radians() / 2.0).sin_cos();
    let (sz, cz) = (z.to_radians() / 2.0).sin_cos();

    [
        sx * cy * cz + cx * sy * sz,
        cx * sy * cz - sx * cy * sz,
        cx * cy * sz + sx * sy * cz,
        cx * cy * cz - sx * sy * sz,
    ]
}

/// ZYX-order Euler angles in degrees from a quaternion.
pub fn euler_zyx_from_quat(q: [f64; 4]) -> [f64; 3] {
    let [x, y, z, w] = q;

    // Rotation matrix entries needed for the ZYX extraction.
    let m11 = 1.0 - 2.0 * (y * y + z * z);
    let m12 = 2.0 * (x * y - w * z);
    let m21 = 2.0 * (x * y + w * z);
    let m22 = 1.0 - 2.0 * (x * x + z * z);
    let m31 = 2.0 * (x * z - w * y);
    let m32 = 2.0 * (y * z + w * x);
    let m33 = 1.0 - 2.0 * (x * x + y * y);

    let ey = (-m31.clamp(-1.0, 1.0)).asin();
    let (ex, ez) = if m31.abs() < 0.999_999_9 {
        (m32.atan2(m33), m21.atan2(m11))
    } else {
        // Gimbal lock: fold the indeterminate axis into z.
        (0.0, (-m12).atan2(m22))
    };

    [ex.to_degrees(), ey.to_degrees(), ez.to_degrees()]
}

/// Re-expresses XYZ-order Euler angles (degrees) in ZYX order.
pub fn reorder_euler_xyz_to_zyx(rotation: [f64; 3]) -> [f64; 3] {
    euler_zyx_from_quat(quat_from_euler_xyz(rotation[0], rotation[1], rotation[2]))
}
