//! Built-in Kepler Objects of Interest catalog.
//!
//! Ids are the column names the prediction service was trained on and must
//! not be renamed.

use super::FeatureDescriptor;

pub(super) fn kepler_features() -> Vec<FeatureDescriptor> {
    vec![
        // Planet, core
        FeatureDescriptor::new("koi_period", "Orbital Period", 0.1, 2000.0)
            .describe("Time between consecutive transits")
            .unit("days")
            .required(),
        FeatureDescriptor::new("koi_duration", "Transit Duration", 0.0, 100.0)
            .describe("Duration of the transit from first to last contact")
            .unit("hours")
            .required(),
        FeatureDescriptor::new("koi_depth", "Transit Depth", 0.0, 1_000_000.0)
            .describe("Fractional stellar flux lost at transit minimum")
            .unit("ppm")
            .required(),
        FeatureDescriptor::new("koi_impact", "Impact Parameter", 0.0, 3.0)
            .describe("Sky-projected distance between star and planet centers at conjunction, in stellar radii")
            .required(),
        FeatureDescriptor::new("koi_model_snr", "Signal-to-Noise Ratio", 0.0, 10_000.0)
            .describe("Transit depth normalized by the mean flux uncertainty in transit")
            .required(),
        FeatureDescriptor::new("koi_num_transits", "Number of Transits", 0.0, 5000.0)
            .describe("Number of transits observed in the light curve")
            .required(),
        // Planet, advanced
        FeatureDescriptor::new("koi_ror", "Planet-Star Radius Ratio", 0.0, 5.0)
            .describe("Planet radius divided by stellar radius")
            .advanced(),
        FeatureDescriptor::new("koi_prad", "Planetary Radius", 0.0, 500.0)
            .describe("Radius of the planet")
            .unit("Earth radii")
            .advanced(),
        // Stellar, core
        FeatureDescriptor::new("st_teff", "Effective Temperature", 2000.0, 12_000.0)
            .describe("Photospheric temperature of the host star")
            .unit("K")
            .stellar()
            .required(),
        FeatureDescriptor::new("st_logg", "Surface Gravity", 0.0, 6.0)
            .describe("Base-10 logarithm of the stellar surface gravity")
            .unit("log10(cm/s^2)")
            .stellar()
            .required(),
        FeatureDescriptor::new("st_met", "Metallicity", -2.5, 1.0)
            .describe("Iron abundance relative to the Sun")
            .unit("dex")
            .stellar()
            .required(),
        FeatureDescriptor::new("st_mass", "Stellar Mass", 0.05, 10.0)
            .describe("Mass of the host star")
            .unit("solar masses")
            .stellar()
            .required(),
        FeatureDescriptor::new("st_radius", "Stellar Radius", 0.05, 100.0)
            .describe("Photospheric radius of the host star")
            .unit("solar radii")
            .stellar()
            .required(),
        // Stellar, advanced
        FeatureDescriptor::new("st_dens", "Stellar Density", 0.0, 200.0)
            .describe("Mean density of the host star")
            .unit("g/cm^3")
            .stellar()
            .advanced(),
        uncertainty("teff_err1", "Temperature Upper Uncertainty", 0.0, 2000.0, "K"),
        uncertainty("teff_err2", "Temperature Lower Uncertainty", -2000.0, 0.0, "K"),
        uncertainty("logg_err1", "Surface Gravity Upper Uncertainty", 0.0, 2.0, "log10(cm/s^2)"),
        uncertainty("logg_err2", "Surface Gravity Lower Uncertainty", -2.0, 0.0, "log10(cm/s^2)"),
        uncertainty("feh_err1", "Metallicity Upper Uncertainty", 0.0, 1.0, "dex"),
        uncertainty("feh_err2", "Metallicity Lower Uncertainty", -1.0, 0.0, "dex"),
        uncertainty("mass_err1", "Mass Upper Uncertainty", 0.0, 5.0, "solar masses"),
        uncertainty("mass_err2", "Mass Lower Uncertainty", -5.0, 0.0, "solar masses"),
        uncertainty("radius_err1", "Radius Upper Uncertainty", 0.0, 50.0, "solar radii"),
        uncertainty("radius_err2", "Radius Lower Uncertainty", -50.0, 0.0, "solar radii"),
    ]
}

fn uncertainty(id: &str, label: &str, min: f64, max: f64, unit: &str) -> FeatureDescriptor {
    FeatureDescriptor::new(id, label, min, max)
        .describe("Measurement uncertainty of the stellar parameter")
        .unit(unit)
        .stellar()
        .advanced()
}
