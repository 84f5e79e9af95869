/// Multi-stage build for a ROS 2 Humble workspace served by the AWS Lambda
/// runtime interface client. The first stage installs `awslambdaric` next to
/// the function code; the second copies that tree plus the colcon `install/`
/// directory of the workspace.
pub const DOCKERFILE_TEMPLATE: &str = r#"
# Define function directory
ARG FUNCTION_DIR="/function"
ARG BASE_IMAGE="osrf/ros:humble-desktop"
FROM ${BASE_IMAGE} as build-image

# Install aws-lambda-cpp build dependencies
RUN apt-get update && \
  apt-get install -y \
  g++ \
  make \
  cmake \
  unzip \
  python3-pip \
  libcurl4-openssl-dev

# Include global arg in this stage of the build
ARG FUNCTION_DIR
# Create function directory
RUN mkdir -p ${FUNCTION_DIR}

# Copy function code
COPY ./src/FogROS2-lambda/fogros2/app/* ${FUNCTION_DIR}

# Install the runtime interface client
RUN pip install \
        --target ${FUNCTION_DIR} \
        awslambdaric

# Multi-stage build: grab a fresh copy of the base image
FROM ${BASE_IMAGE}

# Include global arg in this stage of the build
ARG FUNCTION_DIR
# Set working directory to function root directory
WORKDIR ${FUNCTION_DIR}

# Copy in the build image dependencies
COPY --from=build-image ${FUNCTION_DIR} ${FUNCTION_DIR}


WORKDIR fog_ws
RUN mkdir install
COPY ./install ./install

ENTRYPOINT [ "/usr/bin/python3", "-m", "awslambdaric" ]
CMD [ "app.handler" ]
"#;
