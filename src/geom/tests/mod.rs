mod test_curve_basic;
mod test_quaternion_basic;
mod test_surface_plot_basic;
