pub mod boundary;
pub mod profile;
pub mod reflect_loss;

pub use boundary::{Boundary, FlatBoundary, LAMBERT_COEFFICIENT, LayeredVolume, VolumeModel};
pub use profile::{ConstantProfile, LinearProfile, SoundSpeedProfile};
pub use reflect_loss::{ConstantLoss, RayleighLoss, ReflectLossModel};

/// Environment seen by the wavefront: sound speed, surface, bottom and
/// optional volume scattering layers.
pub struct Ocean {
    profile: Box<dyn SoundSpeedProfile>,
    surface: Box<dyn Boundary>,
    bottom: Box<dyn Boundary>,
    volume: Option<Box<dyn VolumeModel>>,
}

impl Ocean {
    pub fn new(
        profile: impl SoundSpeedProfile + 'static,
        surface: impl Boundary + 'static,
        bottom: impl Boundary + 'static,
    ) -> Self {
        Self {
            profile: Box::new(profile),
            surface: Box::new(surface),
            bottom: Box::new(bottom),
            volume: None,
        }
    }

    /// Isovelocity ocean with a lossless surface and a flat lossless bottom.
    pub fn isovelocity(speed: f64, depth: f64) -> Self {
        Self::new(
            ConstantProfile::new(speed),
            FlatBoundary::surface(),
            FlatBoundary::bottom(depth),
        )
    }

    /// Adds volume scattering layers.
    pub fn with_volume(mut self, volume: impl VolumeModel + 'static) -> Self {
        self.volume = Some(Box::new(volume));
        self
    }

    pub fn profile(&self) -> &dyn SoundSpeedProfile {
        self.profile.as_ref()
    }

    pub fn surface(&self) -> &dyn Boundary {
        self.surface.as_ref()
    }

    pub fn bottom(&self) -> &dyn Boundary {
        self.bottom.as_ref()
    }

    pub fn volume(&self) -> Option<&dyn VolumeModel> {
        self.volume.as_deref()
    }

    /// Number of volume layers (zero without a volume model).
    pub fn layer_count(&self) -> usize {
        self.volume.as_ref().map_or(0, |v| v.layer_count())
    }
}
