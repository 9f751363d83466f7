use rubble_core::types::{Mat3, Vec3, outer};

/// Mass, centre of mass and inertia tensor about the body origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MassProps {
    pub mass: f32,
    pub inv_mass: f32,
    /// Tracked through `translate` and `add`; bodies require it at the origin.
    pub com: Vec3,
    pub inertia: Mat3,
}

/// (c·c) E − c cᵀ, i.e. the negated square of the cross-product matrix of `c`.
#[inline]
fn point_inertia(c: Vec3) -> Mat3 {
    Mat3::from_diagonal(glam::Vec3::splat(c.length_squared())) - outer(c, c)
}

impl MassProps {
    pub fn infinite() -> Self {
        Self { mass: f32::INFINITY, inv_mass: 0.0, com: Vec3::ZERO, inertia: Mat3::IDENTITY }
    }

    fn from_parts(mass: f32, diag: Vec3) -> Self {
        Self { mass, inv_mass: 1.0 / mass, com: Vec3::ZERO, inertia: Mat3::from_diagonal(diag.into()) }
    }

    pub fn from_sphere(radius: f32, density: f32) -> Self {
        let vol = (4.0 / 3.0) * core::f32::consts::PI * radius * radius * radius;
        let m = density * vol;
        Self::from_parts(m, Vec3::splat(0.4 * m * radius * radius))
    }

    /// Solid box given by its full side lengths.
    pub fn from_box(sides: Vec3, density: f32) -> Self {
        let m = density * sides.x * sides.y * sides.z;
        let s2 = sides * sides;
        let ix = (1.0 / 12.0) * m * (s2.y + s2.z);
        let iy = (1.0 / 12.0) * m * (s2.x + s2.z);
        let iz = (1.0 / 12.0) * m * (s2.x + s2.y);
        Self::from_parts(m, Vec3::new(ix, iy, iz))
    }

    /// Solid cylinder along local Z, full length `len`.
    pub fn from_cylinder(radius: f32, len: f32, density: f32) -> Self {
        let m = density * core::f32::consts::PI * radius * radius * len;
        let r2 = radius * radius;
        let across = m * (0.25 * r2 + len * len / 12.0);
        Self::from_parts(m, Vec3::new(across, across, 0.5 * m * r2))
    }

    /// Overrides the total mass, scaling the inertia to match.
    pub fn with_mass(mut self, mass: f32) -> Self {
        let k = mass / self.mass;
        self.inertia = self.inertia * k;
        self.mass = mass;
        self.inv_mass = 1.0 / mass;
        self
    }

    /// Moves the mass distribution by `a`. Inertia stays expressed about the origin.
    pub fn translate(&mut self, a: Vec3) {
        let c = self.com;
        // I_origin = I_com + m·J(c); shift c → c + a
        self.inertia = self.inertia + (point_inertia(c + a) - point_inertia(c)) * self.mass;
        self.com = c + a;
    }

    pub fn translated(mut self, a: Vec3) -> Self { self.translate(a); self }

    pub fn add(&mut self, other: &MassProps) {
        let total = self.mass + other.mass;
        self.com = (self.com * self.mass + other.com * other.mass) / total;
        self.inertia = self.inertia + other.inertia;
        self.mass = total;
        self.inv_mass = 1.0 / total;
    }

    /// Inverse inertia; zero for infinite mass.
    pub fn inv_inertia(&self) -> Mat3 {
        if self.inv_mass == 0.0 { return Mat3::ZERO; }
        self.inertia.inverse()
    }
}
