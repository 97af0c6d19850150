use allow_servlet::{evaluate, Result, SecurityConstraint, WebResourceCollection};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let none: [&str; 0] = [];

    let admin = SecurityConstraint::new(
        vec![WebResourceCollection::all_methods(vec!["/admin/*"])],
        vec!["admin"],
        true,
        false,
    )?;
    let reports = SecurityConstraint::new(
        vec![WebResourceCollection::new(
            vec!["/admin/reports/*", "*.csv"],
            vec!["GET"],
            none,
            false,
        )?],
        vec!["auditor"],
        true,
        false,
    )?;
    let constraints = vec![admin, reports];

    let response = evaluate("/admin/reports/2020.csv", "GET", &constraints);
    println!(
        "roles: {:?}, ssl required: {}, precluded: {}",
        response.roles(),
        response.is_ssl_required(),
        response.is_access_precluded()
    );

    Ok(())
}
