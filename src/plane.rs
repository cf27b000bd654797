//! Least-squares plane fitting for 3D point clouds.

use nalgebra::{DMatrix, Matrix3, RealField, RowVector3, SymmetricEigen, Vector3};

/// Fits a plane to a 3D point cloud in the least-squares sense.
///
/// Returns the unit normal of the fitted plane and its centroid (a point on the
/// plane). The normal is the eigenvector of the point covariance matrix
/// belonging to its smallest eigenvalue; its orientation is arbitrary.
///
/// # Panics
///
/// Panics if the points are not three-dimensional or fewer than three points
/// are given.
pub fn fit_plane<T: RealField>(points: &DMatrix<T>) -> (RowVector3<T>, RowVector3<T>) {
    assert_eq!(points.ncols(), 3, "plane fitting requires 3D points");
    let n = points.nrows();
    assert!(n >= 3, "plane fitting requires at least three points");

    let scale = T::one() / nalgebra::convert::<f64, T>(n as f64);
    let mut centroid = Vector3::zeros();
    for i in 0..n {
        centroid += Vector3::new(
            points[(i, 0)].clone(),
            points[(i, 1)].clone(),
            points[(i, 2)].clone(),
        );
    }
    centroid *= scale;

    let mut covariance = Matrix3::zeros();
    for i in 0..n {
        let offset = Vector3::new(
            points[(i, 0)].clone(),
            points[(i, 1)].clone(),
            points[(i, 2)].clone(),
        ) - centroid.clone();
        covariance += offset.clone() * offset.transpose();
    }

    let eigen = SymmetricEigen::new(covariance);
    let mut smallest = 0;
    for k in 1..3 {
        if eigen.eigenvalues[k] < eigen.eigenvalues[smallest] {
            smallest = k;
        }
    }
    let normal = eigen.eigenvectors.column(smallest).normalize();

    (normal.transpose(), centroid.transpose())
}
