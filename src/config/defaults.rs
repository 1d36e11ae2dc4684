//! Default configuration values

/// Environment variable naming the user function entry point (required at build)
pub const FUNCTION_TARGET_ENV: &str = "FUNCTION_TARGET";

/// Environment variable whose presence opts this buildpack in (value ignored)
pub const TRIGGER_ENV: &str = "GRAALVM_FUNCTION";

/// Environment variable exported to point at the installed SDK root
pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

/// Stable identifier of the toolchain layer
pub const LAYER_NAME: &str = "java-graalvm";

/// Package updater binary, relative to the layer root
pub const GU_RELATIVE_PATH: &str = "bin/gu";

/// Component the package updater installs
pub const NATIVE_IMAGE_COMPONENT: &str = "native-image";

/// Build tool project descriptor gating native compilation
pub const MAVEN_DESCRIPTOR: &str = "pom.xml";

/// Maven profile that activates native-image compilation
pub const MAVEN_NATIVE_PROFILE: &str = "native";

/// Invoker executable declared as the launch entry point
pub const INVOKER_PATH: &str = "./target/function-invoker";

/// File the launch command is written to
pub const LAUNCH_FILE: &str = "launch.toml";

/// Detect exit code signalling the buildpack does not apply
pub const DETECT_OPT_OUT_EXIT: i32 = 100;
