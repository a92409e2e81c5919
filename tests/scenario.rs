//! Reference operating point: g₀ = 1 kHz, n_p = 10⁶, γₑ = 100 MHz, γᵢ = 0,
//! Δt = 100 ns, t_r = 1 μs.

use heralded_transducer::{
    rates::{ self, EntanglementModel, Regime },
    Config,
    Observables,
    Params,
};

const R0: f64 = 4.0 * 1e3 * 1e3 * 1e6 * 1e8 / (1e8 * 1e8);

fn params() -> Params {
    Params {
        g0: 1e3,
        n_p: 1e6,
        gamma_e: 1e8,
        gamma_i: 0.0,
        pulse_duration: 1e-7,
        reset_time: 1e-6,
    }
}

#[test]
fn detection_rate() {
    let p = params();
    assert_eq!(R0, 4e4);
    let r0 = rates::detection_rate(p.g0, p.n_p, p.gamma_e, p.gamma_i);
    assert!((r0 - R0).abs() < 1e-9);
}

#[test]
fn entanglement_rates() {
    let p = params();
    let (dt, tr) = (p.pulse_duration, p.reset_time);
    let single = 2.0 * R0 * (-R0 * dt).exp() * dt / (dt + tr);
    let double = 2.0 * R0 * R0 * (-R0 * dt).exp() * dt * dt / (2.0 * (dt + tr));
    let cases = [
        (EntanglementModel::SingleClick, false, single),
        (EntanglementModel::SingleClick, true, single / 2.0),
        (EntanglementModel::TwoClick, false, double),
        (EntanglementModel::TwoClick, true, double / 2.0),
    ];
    for (model, purification, expected) in cases {
        let r_e = rates::entanglement_rate_for(&p, model, purification);
        assert!(
            (r_e - expected).abs() <= 1e-12 * expected,
            "{model}, purification = {purification}: {r_e} vs {expected}",
        );
    }
    assert!((single - 7243.7).abs() < 0.1);
}

#[test]
fn full_evaluation() {
    let config = Config::from_toml_str(
        include_str!("../config/default.toml")).unwrap();
    assert_eq!(config.params(), params());
    let obs = Observables::compute(&config).unwrap();
    assert_eq!(obs.regime, Regime::BeginningToBreak);
    assert!(obs.deviation < 1e-4);
    assert!((obs.r0 - R0).abs() < 1e-9);
    let expected = 2.0 * R0 * (-R0 * 1e-7).exp() * 1e-7 / 1.1e-6;
    assert!((obs.r_e - expected).abs() < 1e-9 * expected);

    let dir = tempfile::tempdir().unwrap();
    obs.write_npz(dir.path()).unwrap();
    let names: Vec<String>
        = std::fs::read_dir(dir.path()).unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 3);
}
