pub mod fixed_face_detector;
