use super::types::ParticleKind;

/// One transport step as delivered by the transport engine.
///
/// Energies are kinetic energies in MeV at the pre-step (`start_energy`) and
/// post-step (`end_energy`) points; `step_length` is in mm and only used for
/// photons. The material name is opaque and forwarded to the stopping-power
/// provider unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportStep<'a> {
    pub start_energy: f64,
    pub end_energy: f64,
    pub step_length: f64,
    pub weight: f64,
    pub particle: ParticleKind,
    pub is_primary: bool,
    pub material: &'a str,
}

impl<'a> TransportStep<'a> {
    /// Creates a photon step of unit weight.
    pub fn photon(energy: f64, step_length: f64, material: &'a str) -> Self {
        Self {
            start_energy: energy,
            end_energy: energy,
            step_length,
            weight: 1.0,
            particle: ParticleKind::Photon,
            is_primary: false,
            material,
        }
    }

    /// Creates a charged-lepton step of unit weight losing energy from
    /// `start_energy` to `end_energy`.
    pub fn charged(
        particle: ParticleKind,
        start_energy: f64,
        end_energy: f64,
        material: &'a str,
    ) -> Self {
        Self {
            start_energy,
            end_energy,
            step_length: 0.0,
            weight: 1.0,
            particle,
            is_primary: false,
            material,
        }
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self { weight, ..self }
    }

    pub fn with_primary(self, is_primary: bool) -> Self {
        Self { is_primary, ..self }
    }

    pub fn with_step_length(self, step_length: f64) -> Self {
        Self {
            step_length,
            ..self
        }
    }

    /// Energy lost along the step.
    #[inline]
    pub fn energy_loss(&self) -> f64 {
        self.start_energy - self.end_energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_fields() {
        let step = TransportStep::charged(ParticleKind::Electron, 5.0, 4.0, "G4_WATER")
            .with_weight(0.5)
            .with_primary(true);
        assert_eq!(step.particle, ParticleKind::Electron);
        assert_eq!(step.weight, 0.5);
        assert!(step.is_primary);
        assert_eq!(step.energy_loss(), 1.0);
        assert_eq!(step.material, "G4_WATER");
    }

    #[test]
    fn photon_step_keeps_energy() {
        let step = TransportStep::photon(1.25, 3.0, "G4_AIR");
        assert_eq!(step.start_energy, step.end_energy);
        assert_eq!(step.step_length, 3.0);
        assert_eq!(step.energy_loss(), 0.0);
    }
}
