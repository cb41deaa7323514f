pub mod configuration;

pub mod editor {
    pub mod curveeditsession;
}

pub mod manager {
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod curve {
        pub mod curve;
        pub mod hermite;
        pub mod keyframe {
            pub mod keyframeid;
            pub mod keyframe;
            pub mod keyframecurve;
            pub mod keyframejson;
        }
        pub mod nonparametriccurve {
            pub mod nonparametriccurve;
        }
    }
}

pub mod preset {
    pub mod curvepreset;
    pub mod curvepresetmanager;
}
