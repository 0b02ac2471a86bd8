pub mod classification {
    pub mod domain {
        pub mod face_geometry;
        pub mod face_shape;
        pub mod face_shape_classifier;
    }
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod catalog {
    pub mod domain {
        pub mod catalog_cache;
        pub mod catalog_entry;
        pub mod catalog_repository;
        pub mod catalog_source;
    }
    pub mod infrastructure;
}

pub mod compositing {
    pub mod domain {
        pub mod frame_asset;
        pub mod frame_compositor;
        pub mod frame_image_source;
        pub mod placement_policy;
    }
    pub mod infrastructure;
}

pub mod imaging {
    pub mod domain {
        pub mod image_writer;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod frame_ranker;
    pub mod try_on_logger;
    pub mod try_on_use_case;
}

pub mod shared {
    pub mod constants;
    pub mod outcome;
    pub mod placement;
}
