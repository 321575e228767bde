//! Spec template rendering

use crate::spec::SpecData;

const LICENSE_PLACEHOLDER: &str = "MIT (example)";

/// Render a new spec file from its data
pub fn render_spec(data: &SpecData) -> String {
    let license = match &data.license {
        Some(license) => format!("'{}'", license),
        None => format!("'{}'", LICENSE_PLACEHOLDER),
    };

    format!(
        r#"#
#  Be sure to run `spec lint {name}.podspec' to ensure this is a
#  valid spec before submitting it.
#
#  Remove the comments once you are done with them.
#

Pod::Spec.new do |s|
  s.name         = "{name}"
  s.version      = "{version}"
  s.summary      = "{summary}"

  # A longer description than the summary, if it helps users.
  # s.description  = <<-DESC
  #                  DESC

  s.homepage     = "{homepage}"
  # s.screenshots  = "www.example.com/screenshots_1.gif"

  # The license file is picked up automatically if it is in the repository
  # root, otherwise name it explicitly:
  # s.license      = {{ :type => 'MIT', :file => 'LICENSE' }}
  s.license      = {license}

  s.author       = {{ "{author_name}" => "{author_email}" }}

  # Pin the source to a tag or a commit. Tags are preferred.
  s.source       = {{ :git => "{source_url}", :{ref_kind} => "{ref_value}" }}

  # s.platform     = :ios, '12.0'
  # s.ios.deployment_target = '12.0'
  # s.osx.deployment_target = '10.13'

  # Files are resolved relative to the repository root.
  s.source_files = 'Classes', 'Classes/**/*.{{h,m,swift}}'
  # s.exclude_files = 'Classes/Exclude'
  # s.public_header_files = 'Classes/**/*.h'

  # s.resources = "Resources/*.png"
  # s.frameworks = 'SomeFramework', 'AnotherFramework'
  # s.libraries = 'iconv', 'xml2'

  # s.requires_arc = true
  # s.dependency 'JSONKit', '~> 1.4'
end
"#,
        name = escape(&data.name),
        version = escape(&data.version),
        summary = escape(&data.summary),
        homepage = escape(&data.homepage),
        license = license,
        author_name = escape(&data.author_name),
        author_email = escape(&data.author_email),
        source_url = escape(&data.source_url),
        ref_kind = data.ref_kind,
        ref_value = escape(&data.ref_value),
    )
}

/// Issue text asking a repository owner to start tagging releases
pub fn semantic_versioning_notice(repo_id: &str, spec_name: &str) -> String {
    format!(
        r#"--- ISSUE TEMPLATE -------------------------------------------------------

I've added [{spec_name}](https://github.com/{repo_id}) to the CocoaPods spec
repository so it can be installed as a dependency.

{spec_name} does not have any version tags yet, so the spec points at the
current HEAD as version 0.0.1. Semantic version tags make dependency
resolution much easier for everyone who uses the library.

Tagging the current HEAD as 1.0.0 looks like this:

    $ git tag -a 1.0.0 -m "Tag release 1.0.0"
    $ git push --tags

--- TEMPLATE END ---------------------------------------------------------"#
    )
}

/// URL for opening the issue suggested by the notice
pub fn new_issue_url(repo_id: &str) -> String {
    format!("https://github.com/{}/issues/new", repo_id)
}

/// Title for the issue suggested by the notice
pub const NOTICE_ISSUE_TITLE: &str = "Please add semantic version tags";

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
